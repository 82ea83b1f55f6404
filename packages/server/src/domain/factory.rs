//! Factory: ドメインオブジェクトの生成

use rand::Rng;

use super::{SESSION_ID_LEN, SessionId};

/// 見間違えやすい文字（I, O, 0, 1）を除いた 32 文字
pub const SESSION_ID_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// セッションコードの生成
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// ランダムな 6 文字のセッションコードを生成
    ///
    /// 既存セッションとの重複チェックは行わない（呼び出し側で上書きを避ける）。
    pub fn generate() -> SessionId {
        Self::generate_with(&mut rand::rng())
    }

    /// 乱数生成器を指定してセッションコードを生成
    pub fn generate_with<R: Rng>(rng: &mut R) -> SessionId {
        let code: String = (0..SESSION_ID_LEN)
            .map(|_| SESSION_ID_ALPHABET[rng.random_range(0..SESSION_ID_ALPHABET.len())] as char)
            .collect();
        SessionId::from_generated(code)
    }
}

//! File admission control.
//!
//! The size ceiling is enforced on the client only; the relay forwards
//! whatever it receives.

use super::error::AdmissionError;

/// Largest file a client will send (50 MiB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Check a file size against [`MAX_FILE_SIZE`] before anything is read or sent
pub fn admit_file_size(size: u64) -> Result<(), AdmissionError> {
    if size > MAX_FILE_SIZE {
        return Err(AdmissionError::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_max_size_is_accepted() {
        // テスト項目: ちょうど 50 MiB (52,428,800 バイト) のファイルは受け付ける
        // when (操作):
        let result = admit_file_size(52_428_800);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_one_byte_over_is_rejected() {
        // テスト項目: 50 MiB + 1 バイトのファイルは拒否される
        // when (操作):
        let result = admit_file_size(52_428_801);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(AdmissionError::FileTooLarge {
                size: 52_428_801,
                max: 52_428_800
            })
        );
    }

    #[test]
    fn test_empty_file_is_accepted() {
        // テスト項目: 0 バイトのファイルも受け付ける
        // then (期待する結果):
        assert!(admit_file_size(0).is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use rust_decimal_macros::dec;

use expense_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid file format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported file version: 99");
    }

    #[test]
    fn encryption() {
        let err = CoreError::Encryption("AES key size invalid".into());
        assert_eq!(err.to_string(), "Encryption failed: AES key size invalid");
    }

    #[test]
    fn decryption() {
        assert_eq!(
            CoreError::Decryption.to_string(),
            "Decryption failed: wrong password or corrupted file"
        );
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("size limit".into());
        assert_eq!(err.to_string(), "Serialization error: size limit");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("bankBalance: \"abc\"".into());
        assert_eq!(
            err.to_string(),
            "Deserialization error: bankBalance: \"abc\""
        );
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("storage.path must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: storage.path must not be empty"
        );
    }

    #[test]
    fn invalid_amount() {
        let err = CoreError::InvalidAmount("amount must be positive, got 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid amount: amount must be positive, got 0"
        );
    }

    #[test]
    fn unknown_category_is_quoted() {
        let err = CoreError::UnknownCategory("Groceries".into());
        assert_eq!(err.to_string(), "Unknown category: \"Groceries\"");
    }

    #[test]
    fn unknown_category_empty() {
        let err = CoreError::UnknownCategory(String::new());
        assert_eq!(err.to_string(), "Unknown category: \"\"");
    }

    #[test]
    fn unknown_transaction_type() {
        let err = CoreError::UnknownTransactionType("refund".into());
        assert_eq!(
            err.to_string(),
            "Unknown transaction type: \"refund\" (expected income or expense)"
        );
    }

    #[test]
    fn insufficient_cash() {
        let err = CoreError::InsufficientCash {
            requested: dec!(500),
            available: dec!(300.50),
        };
        assert_eq!(
            err.to_string(),
            "Cannot move 500 to the bank: only 300.50 cash on hand"
        );
    }

    #[test]
    fn insufficient_bank_balance() {
        let err = CoreError::InsufficientBankBalance {
            requested: dec!(10),
            available: dec!(0),
        };
        assert_eq!(
            err.to_string(),
            "Cannot withdraw 10: bank balance is only 0"
        );
    }
}

// ── Rejections vs. failures ─────────────────────────────────────────

mod rejection {
    use super::*;

    #[test]
    fn user_errors_are_rejections() {
        let rejections = [
            CoreError::InvalidAmount("x".into()),
            CoreError::UnknownCategory("x".into()),
            CoreError::UnknownTransactionType("x".into()),
            CoreError::InsufficientCash {
                requested: dec!(1),
                available: dec!(0),
            },
            CoreError::InsufficientBankBalance {
                requested: dec!(1),
                available: dec!(0),
            },
        ];
        for err in &rejections {
            assert!(err.is_rejection(), "{err:?} should be a rejection");
        }
    }

    #[test]
    fn storage_errors_are_not_rejections() {
        let failures = [
            CoreError::InvalidFileFormat("x".into()),
            CoreError::UnsupportedVersion(2),
            CoreError::Encryption("x".into()),
            CoreError::Decryption,
            CoreError::Serialization("x".into()),
            CoreError::Deserialization("x".into()),
            CoreError::FileIO("x".into()),
            CoreError::Config("x".into()),
        ];
        for err in &failures {
            assert!(!err.is_rejection(), "{err:?} should not be a rejection");
        }
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoreError = io.into();
        match err {
            CoreError::FileIO(msg) => assert!(msg.contains("gone")),
            other => panic!("expected FileIO, got {other:?}"),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("key: [unclosed").unwrap_err();
        let err: CoreError = yaml_err.into();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn from_bincode_error() {
        let bin_err = bincode::deserialize::<String>(&[0xFF]).unwrap_err();
        let err: CoreError = bin_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here/ledger.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_std_error(_: &dyn std::error::Error) {}
        takes_std_error(&CoreError::Decryption);
    }
}

//! Property-based tests for pactum-cli
//!
//! These tests verify correctness properties using proptest.

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use proptest::prelude::*;

    use crate::config::{CliOverrides, Config};
    use crate::input::MessageSource;
    use crate::output::{OutputFormat, OutputFormatter};
    use pactum_core::HandshakeMessage;

    fn format_strategy() -> impl Strategy<Value = OutputFormat> {
        prop_oneof![
            Just(OutputFormat::Table),
            Just(OutputFormat::Json),
            Just(OutputFormat::Quiet),
        ]
    }

    fn level_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("error"),
            Just("warn"),
            Just("info"),
            Just("debug"),
            Just("trace"),
        ]
    }

    // CLI Override Precedence
    //
    // Any flag given on the command line wins over the config file; any flag
    // left unset keeps the file's value.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_cli_overrides_take_precedence(
            file_format in format_strategy(),
            file_level in level_strategy(),
            flag_format in proptest::option::of(format_strategy()),
            flag_debug in any::<bool>(),
            flag_db in proptest::option::of("[a-z]{1,12}\\.db"),
        ) {
            let mut config = Config::default();
            config.output.format = file_format.to_string();
            config.logging.level = file_level.to_string();

            let overrides = CliOverrides {
                output_format: flag_format.map(|f| f.to_string()),
                verbose: None,
                debug: flag_debug.then_some(true),
                db_path: flag_db.clone().map(PathBuf::from),
            };
            let config = config.with_overrides(&overrides);

            let expected_format = flag_format.unwrap_or(file_format);
            prop_assert_eq!(config.output.format, expected_format.to_string());

            let expected_level = if flag_debug { "debug" } else { file_level };
            prop_assert_eq!(config.logging.level.as_str(), expected_level);

            if let Some(db) = flag_db {
                prop_assert_eq!(config.storage.db_path, Some(PathBuf::from(db)));
            } else {
                prop_assert!(config.storage.db_path.is_none());
            }
            prop_assert!(Config::default().with_overrides(&overrides).validate().is_ok());
        }
    }

    // Message Argument Forms
    //
    // Only `-` means stdin and only a leading `@` means a file; every other
    // argument is inline JSON text, passed through unchanged.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_message_source_inline_passthrough(arg in "[^@-].*") {
            prop_assert_eq!(MessageSource::parse(&arg), MessageSource::Inline(arg.clone()));
        }

        #[test]
        fn test_message_source_file_path(path in "[a-zA-Z0-9_./]{1,40}") {
            let arg = format!("@{path}");
            prop_assert_eq!(MessageSource::parse(&arg), MessageSource::File(PathBuf::from(path)));
        }
    }

    // Quiet Handshake Output
    //
    // In quiet mode a handshake message is printed as a single line that the
    // other party can feed straight back into `--message`.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn test_quiet_message_reloads(
            identifier in "[ -~]{0,24}",
            oneuse in prop::collection::vec(any::<u8>(), 32),
            signing in prop::collection::vec(any::<u8>(), 32),
            signature in prop::collection::vec(any::<u8>(), 64),
        ) {
            let message = HandshakeMessage {
                identifier,
                oneuse_key: pactum_crypto::encoding::encode(&oneuse),
                signing_key: pactum_crypto::encoding::encode(&signing),
                signature: pactum_crypto::encoding::encode(&signature),
            };

            let printed = OutputFormatter::new(OutputFormat::Quiet, false)
                .format_message(&message, "handshake init");
            prop_assert!(!printed.contains('\n'));

            let reloaded = MessageSource::parse(&printed).load().unwrap();
            prop_assert_eq!(reloaded, message);
        }
    }
}

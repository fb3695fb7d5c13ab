//! Command interpretation: pull a device, an action and an optional time
//! phrase out of a free-text utterance.
//!
//! Matching is plain substring search on the lower-cased text:
//!
//! - action: `"on"` anywhere wins, then `"off"`; `"on"` is tested first, so
//!   an utterance containing both resolves to on
//! - device: first vocabulary keyword (in vocabulary order) found anywhere
//! - time phrase: everything after the first `"at"`, trimmed
//!
//! No attempt is made to filter `"at"` inside other words ("heater",
//! "what"); whatever follows the first occurrence is handed to the time
//! parser as-is.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, DeviceStatus};
use crate::error::ValidationError;

/// One keyword → device mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub keyword: String,
    pub device: DeviceId,
}

/// Result of interpreting an utterance. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interpretation {
    pub device: Option<DeviceId>,
    pub action: Option<DeviceStatus>,
    pub time_fragment: Option<String>,
}

impl Interpretation {
    /// Device and action, when both were recognised.
    #[must_use]
    pub fn intent(&self) -> Option<(&DeviceId, DeviceStatus)> {
        Some((self.device.as_ref()?, self.action?))
    }
}

/// Stateless interpreter over an ordered device vocabulary.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    vocabulary: Vec<VocabularyEntry>,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self {
            vocabulary: vec![
                VocabularyEntry {
                    keyword: "fan".to_string(),
                    device: DeviceId::from_static("Fan"),
                },
                VocabularyEntry {
                    keyword: "light".to_string(),
                    device: DeviceId::from_static("Light"),
                },
            ],
        }
    }
}

impl CommandInterpreter {
    /// Build an interpreter from an ordered vocabulary. Keywords are trimmed
    /// and lower-cased; earlier entries take precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyVocabulary`] when no entries are given
    /// and [`ValidationError::EmptyKeyword`] for a blank keyword.
    pub fn new(
        vocabulary: impl IntoIterator<Item = VocabularyEntry>,
    ) -> Result<Self, ValidationError> {
        let vocabulary = vocabulary
            .into_iter()
            .map(|entry| {
                let keyword = entry.keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(ValidationError::EmptyKeyword);
                }
                Ok(VocabularyEntry {
                    keyword,
                    device: entry.device,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if vocabulary.is_empty() {
            return Err(ValidationError::EmptyVocabulary);
        }
        Ok(Self { vocabulary })
    }

    /// Devices named by the vocabulary, in vocabulary order (duplicates kept).
    pub fn devices(&self) -> impl Iterator<Item = &DeviceId> {
        self.vocabulary.iter().map(|entry| &entry.device)
    }

    /// Interpret an utterance. Pure: no state is read or written.
    #[must_use]
    pub fn interpret(&self, utterance: &str) -> Interpretation {
        let text = utterance.to_lowercase();

        let action = if text.contains("on") {
            Some(DeviceStatus::On)
        } else if text.contains("off") {
            Some(DeviceStatus::Off)
        } else {
            None
        };

        let device = self
            .vocabulary
            .iter()
            .find(|entry| text.contains(entry.keyword.as_str()))
            .map(|entry| entry.device.clone());

        let time_fragment = text
            .split_once("at")
            .map(|(_, rest)| rest.trim().to_string());

        Interpretation {
            device,
            action,
            time_fragment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan() -> DeviceId {
        DeviceId::new("Fan").unwrap()
    }

    fn light() -> DeviceId {
        DeviceId::new("Light").unwrap()
    }

    #[test]
    fn should_recognise_immediate_command() {
        let parsed = CommandInterpreter::default().interpret("Turn ON fan");
        assert_eq!(
            parsed,
            Interpretation {
                device: Some(fan()),
                action: Some(DeviceStatus::On),
                time_fragment: None,
            }
        );
    }

    #[test]
    fn should_extract_time_fragment_after_at() {
        let parsed = CommandInterpreter::default().interpret("turn off light at 6:10 PM");
        assert_eq!(parsed.device, Some(light()));
        assert_eq!(parsed.action, Some(DeviceStatus::Off));
        assert_eq!(parsed.time_fragment.as_deref(), Some("6:10 pm"));
    }

    #[test]
    fn should_prefer_on_when_both_on_and_off_appear() {
        let parsed = CommandInterpreter::default().interpret("switch off the fan, then on");
        assert_eq!(parsed.action, Some(DeviceStatus::On));
    }

    #[test]
    fn should_prefer_first_device_in_vocabulary_order() {
        let parsed = CommandInterpreter::default().interpret("turn on light and fan");
        assert_eq!(parsed.device, Some(fan()));
    }

    #[test]
    fn should_leave_everything_empty_when_nothing_matches() {
        let parsed = CommandInterpreter::default().interpret("please");
        assert_eq!(parsed, Interpretation::default());
        assert!(parsed.intent().is_none());
    }

    #[test]
    fn should_return_empty_fragment_when_at_ends_the_utterance() {
        let parsed = CommandInterpreter::default().interpret("turn on fan at");
        assert_eq!(parsed.time_fragment.as_deref(), Some(""));
    }

    #[test]
    fn should_split_on_first_at_even_inside_a_word() {
        let interpreter = CommandInterpreter::new([VocabularyEntry {
            keyword: "heater".to_string(),
            device: DeviceId::new("Heater").unwrap(),
        }])
        .unwrap();

        let parsed = interpreter.interpret("turn on heater at 7 pm");
        assert_eq!(parsed.device, Some(DeviceId::new("Heater").unwrap()));
        assert_eq!(parsed.time_fragment.as_deref(), Some("er at 7 pm"));
    }

    #[test]
    fn should_detect_on_inside_other_words() {
        let parsed = CommandInterpreter::default().interpret("light, anyone?");
        assert_eq!(parsed.action, Some(DeviceStatus::On));
    }

    #[test]
    fn should_report_intent_only_when_device_and_action_present() {
        let parsed = CommandInterpreter::default().interpret("turn on");
        assert!(parsed.intent().is_none());

        let parsed = CommandInterpreter::default().interpret("turn on fan");
        assert_eq!(parsed.intent(), Some((&fan(), DeviceStatus::On)));
    }

    #[test]
    fn should_normalize_configured_keywords() {
        let interpreter = CommandInterpreter::new([VocabularyEntry {
            keyword: "  AC ".to_string(),
            device: DeviceId::new("AC").unwrap(),
        }])
        .unwrap();

        let parsed = interpreter.interpret("Switch on the AC");
        assert_eq!(parsed.device, Some(DeviceId::new("AC").unwrap()));
    }

    #[test]
    fn should_reject_empty_vocabulary() {
        let result = CommandInterpreter::new(Vec::new());
        assert!(matches!(result, Err(ValidationError::EmptyVocabulary)));
    }

    #[test]
    fn should_reject_blank_keyword() {
        let result = CommandInterpreter::new([VocabularyEntry {
            keyword: " ".to_string(),
            device: fan(),
        }]);
        assert!(matches!(result, Err(ValidationError::EmptyKeyword)));
    }

    #[test]
    fn should_list_vocabulary_devices_in_order() {
        let interpreter = CommandInterpreter::default();
        let devices: Vec<_> = interpreter.devices().cloned().collect();
        assert_eq!(devices, vec![fan(), light()]);
    }
}

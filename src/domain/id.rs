//! Typed entity identifiers

/// Declares a string-backed identifier for a stored entity
///
/// Generated ids are UUID v4. Ids received from callers are trimmed and must
/// not be empty; any other format is accepted so rows created elsewhere keep
/// their keys.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Wrap a caller-supplied identifier
            pub fn new(id: impl Into<String>) -> Result<Self, $crate::domain::DomainError> {
                let id = id.into();
                let id = id.trim();

                if id.is_empty() {
                    return Err($crate::domain::DomainError::invalid_id(concat!(
                        $label,
                        " ID is required"
                    )));
                }

                Ok(Self(id.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $crate::domain::storage::StorageKey for $name {
            fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

pub(crate) use entity_id;

#[cfg(test)]
mod tests {
    entity_id!(SampleId, "Sample");

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = SampleId::generate();
        let b = SampleId::generate();

        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_new_trims_and_rejects_blank() {
        assert_eq!(SampleId::new("  abc ").unwrap().as_str(), "abc");

        let err = SampleId::new("   ").unwrap_err();
        assert_eq!(err.message(), "Sample ID is required");
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let id = SampleId::new("s-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s-1\"");
        assert!(serde_json::from_str::<SampleId>("\"\"").is_err());
    }
}

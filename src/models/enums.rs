use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ReportType {
    General => "general",
    BloodTest => "blood_test",
    Checkup => "checkup",
    Cardiology => "cardiology",
    Imaging => "imaging",
    Other => "other",
});

impl Default for ReportType {
    fn default() -> Self {
        Self::General
    }
}

impl ReportType {
    /// Lenient parse for caller-supplied labels: blank means `General`,
    /// anything unrecognized becomes `Other`. Accepts "Blood Test" style
    /// labels as well as the stored snake_case form.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
            return Self::General;
        };
        let normalized = label.to_lowercase().replace([' ', '-'], "_");
        normalized.parse().unwrap_or(Self::Other)
    }

    /// The label kept verbatim next to the category: trimmed caller text, or
    /// "General" when blank.
    pub fn display_label(label: Option<&str>) -> String {
        label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("General")
            .to_string()
    }
}

str_enum!(ExtractionMethod {
    SimulatedOcr => "simulated_ocr",
    PlainTextRead => "plain_text_read",
});

str_enum!(UserRole {
    Patient => "patient",
    Doctor => "doctor",
});

str_enum!(AppointmentStatus {
    Confirmed => "confirmed",
});

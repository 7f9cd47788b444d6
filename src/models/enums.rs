use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + label lookup pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Case-insensitive lookup on the trimmed label, for UI input.
            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(label))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(LabDepartment {
    Hematology => "Hematology",
    Microbiology => "Microbiology",
    Chemistry => "Chemistry",
});

str_enum!(AgeGroup {
    Under30 => "Under 30",
    From30To49 => "30-49",
    From50To69 => "50-69",
    Over70 => "70+",
});

str_enum!(ViewMode {
    Chart => "chart",
    Table => "table",
});

str_enum!(ViewPreference {
    Auto => "auto",
    Chart => "chart",
    Table => "table",
});

impl AgeGroup {
    /// Bucket for an age in years: <30, 30-49, 50-69, 70+.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=29 => Self::Under30,
            30..=49 => Self::From30To49,
            50..=69 => Self::From50To69,
            _ => Self::Over70,
        }
    }

    /// Position in the fixed display order.
    pub fn index(&self) -> usize {
        match self {
            Self::Under30 => 0,
            Self::From30To49 => 1,
            Self::From50To69 => 2,
            Self::Over70 => 3,
        }
    }
}

impl ViewPreference {
    /// The mode a section is drawn in, given its own default.
    pub fn resolve(&self, section_default: ViewMode) -> ViewMode {
        match self {
            Self::Auto => section_default,
            Self::Chart => ViewMode::Chart,
            Self::Table => ViewMode::Table,
        }
    }
}

impl Default for ViewPreference {
    fn default() -> Self {
        Self::Auto
    }
}

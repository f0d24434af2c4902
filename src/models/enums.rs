use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(ComponentKind {
    Motor => "motor",
    Finger => "finger",
    Palm => "palm",
    Split => "split",
});

impl ComponentKind {
    /// Name of the id field clients use for this component (`motor_id`, ...).
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::Motor => "motor_id",
            Self::Finger => "finger_id",
            Self::Palm => "palm_id",
            Self::Split => "split_id",
        }
    }

    /// Human label used in messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Motor => "motor",
            Self::Finger => "finger",
            Self::Palm => "palm",
            Self::Split => "split mechanism",
        }
    }

    /// The kind this component is bound to during assembly, if any.
    pub fn parent(&self) -> Option<ComponentKind> {
        match self {
            Self::Motor => Some(Self::Finger),
            Self::Finger => Some(Self::Palm),
            Self::Split => Some(Self::Palm),
            Self::Palm => None,
        }
    }
}

str_enum!(DetectionKind {
    MotorWorm => "motor_worm",
    SplitWorm => "split_worm",
});

impl DetectionKind {
    /// Component the detection is taken on.
    pub fn component(&self) -> ComponentKind {
        match self {
            Self::MotorWorm => ComponentKind::Motor,
            Self::SplitWorm => ComponentKind::Split,
        }
    }
}

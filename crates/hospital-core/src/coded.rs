//! 以文本存储的枚举
//!
//! 角色、状态、类别等字段在存储中是普通文本。Rust 侧使用封闭枚举保证编译期安全，
//! 读写时经由 [`Coded`] 原样保留文本：可识别的值解析为 `Known`，其余保留为
//! `Unknown`，取值是否合法留给业务层通过 [`Coded::known`] 判断。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HospitalError, Result};

/// 文本枚举：每个变体对应一个固定的存储文本
pub trait TextEnum: Copy + Eq + 'static {
    /// 枚举名称，用于错误信息
    const KIND: &'static str;
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_text(text: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == text)
    }
}

/// 存储文本及其解析结果
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Coded<E> {
    Known(E),
    Unknown(String),
}

impl<E: TextEnum> Coded<E> {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match E::from_text(&text) {
            Some(value) => Coded::Known(value),
            None => Coded::Unknown(text),
        }
    }

    /// 存储文本
    pub fn as_text(&self) -> &str {
        match self {
            Coded::Known(value) => value.as_str(),
            Coded::Unknown(text) => text,
        }
    }

    pub fn get(&self) -> Option<E> {
        match self {
            Coded::Known(value) => Some(*value),
            Coded::Unknown(_) => None,
        }
    }

    /// 取出已识别的枚举值，未知文本返回 [`HospitalError::UnknownVariant`]
    pub fn known(&self) -> Result<E> {
        match self {
            Coded::Known(value) => Ok(*value),
            Coded::Unknown(text) => Err(HospitalError::UnknownVariant {
                kind: E::KIND,
                value: text.clone(),
            }),
        }
    }

    pub fn is(&self, value: E) -> bool {
        self.get() == Some(value)
    }
}

impl<E: TextEnum> From<E> for Coded<E> {
    fn from(value: E) -> Self {
        Coded::Known(value)
    }
}

impl<E: TextEnum> fmt::Display for Coded<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

impl<E: TextEnum> Serialize for Coded<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_text())
    }
}

impl<'de, E: TextEnum> Deserialize<'de> for Coded<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Coded::from_text(text))
    }
}

/// 声明文本枚举：生成枚举本体、[`TextEnum`]、`Display`、`FromStr` 以及文本形式的 serde 实现
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::coded::TextEnum for $name {
            const KIND: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::coded::TextEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::HospitalError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                <$name as $crate::coded::TextEnum>::from_text(s).ok_or_else(|| {
                    $crate::error::HospitalError::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::coded::TextEnum::as_str(self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use text_enum;

#[cfg(test)]
mod tests {
    use super::*;

    text_enum! {
        pub enum Shade {
            Light => "light",
            VeryDark => "very dark",
        }
    }

    #[test]
    fn test_known_and_unknown_text() {
        let light: Coded<Shade> = Coded::from_text("light");
        assert_eq!(light, Coded::Known(Shade::Light));
        assert_eq!(light.as_text(), "light");

        let odd: Coded<Shade> = Coded::from_text("Light");
        assert_eq!(odd, Coded::Unknown("Light".to_string()));
        assert_eq!(odd.as_text(), "Light");
        assert!(odd.known().is_err());
    }

    #[test]
    fn test_text_with_space_round_trips() {
        let json = serde_json::to_string(&Coded::from(Shade::VeryDark)).unwrap();
        assert_eq!(json, "\"very dark\"");

        let back: Coded<Shade> = serde_json::from_str(&json).unwrap();
        assert!(back.is(Shade::VeryDark));
    }

    #[test]
    fn test_unknown_variant_error() {
        let err = "dim".parse::<Shade>().unwrap_err();
        match err {
            HospitalError::UnknownVariant { kind, value } => {
                assert_eq!(kind, "Shade");
                assert_eq!(value, "dim");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

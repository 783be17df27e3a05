//! Naming strategies deriving default table and column names.

use serde::Deserialize;

pub trait NamingStrategy: Send + Sync {
    /// Column name for `field_name` when `<field>` declares no `column`.
    fn property_to_column_name(&self, field_name: &str, class_name: &str) -> String;

    /// Table name for `class_name` when the root element declares no `table`.
    fn class_to_table_name(&self, class_name: &str) -> String;
}

/// Selects a built-in strategy from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategyKind {
    #[default]
    Default,
    Underscore,
}

/// Uses field names unchanged and the short class name as table name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn property_to_column_name(&self, field_name: &str, _class_name: &str) -> String {
        field_name.to_string()
    }

    fn class_to_table_name(&self, class_name: &str) -> String {
        short_class_name(class_name).to_string()
    }
}

/// Lower snake_case names (`createdAt` -> `created_at`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderscoreNamingStrategy;

impl NamingStrategy for UnderscoreNamingStrategy {
    fn property_to_column_name(&self, field_name: &str, _class_name: &str) -> String {
        to_snake_case(field_name)
    }

    fn class_to_table_name(&self, class_name: &str) -> String {
        to_snake_case(short_class_name(class_name))
    }
}

/// Last segment of a namespaced class name (`App\Model\User` -> `User`).
pub fn short_class_name(class_name: &str) -> &str {
    class_name
        .rsplit(['\\', ':'])
        .next()
        .unwrap_or(class_name)
}

/// Convert camelCase / PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_is_lower_or_digit = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_is_lower_or_digit {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_is_lower_or_digit = false;
        } else {
            out.push(c);
            prev_is_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out
}

//! SQL dialect metadata
//!
//! Object editors never hardcode per-database syntax decisions; they read
//! identifier quoting and feature support from `DialectInfo` so the same
//! editor works against every target dialect.

use std::borrow::Cow;

/// DDL capabilities that vary between dialects.
///
/// Editors query these through [`DialectInfo::supports`] instead of
/// matching on the dialect id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectFeature {
    /// `ALTER TABLE .. RENAME CONSTRAINT`
    RenameConstraint,
    /// `ALTER TABLE .. RENAME COLUMN`
    RenameColumn,
    /// `DROP .. CASCADE`
    DropCascade,
    /// `ALTER TABLE .. ALTER COLUMN .. TYPE`
    AlterColumnType,
    /// `CREATE OR REPLACE VIEW` / procedure bodies
    CreateOrReplace,
    /// `DROP .. IF EXISTS`
    IfExists,
    /// `COMMENT ON ..` statements
    CommentOn,
    /// Database-level DDL must run outside any transaction
    /// (e.g. `CREATE DATABASE` on PostgreSQL)
    AtomicDatabaseDdl,
}

/// Dialect information consumed by the object editors.
///
/// # Examples
///
/// ```
/// use ddlforge_core::DialectInfo;
///
/// let pg = DialectInfo::postgres();
/// assert_eq!(pg.quote_identifier("user table"), "\"user table\"");
///
/// let my = DialectInfo::mysql();
/// assert_eq!(my.quote_identifier("users"), "`users`");
/// ```
#[derive(Debug, Clone)]
pub struct DialectInfo {
    /// Dialect identifier (e.g. "postgresql", "mysql")
    pub id: Cow<'static, str>,
    /// Display name
    pub display_name: Cow<'static, str>,
    /// Opening identifier quote character
    pub identifier_quote: char,
    /// Closing identifier quote character (differs from the opening one
    /// only for bracket-quoting dialects)
    pub close_quote: char,
    /// Statement terminator (usually ';')
    pub statement_terminator: char,
    /// Whether identifiers are case-sensitive
    pub case_sensitive_identifiers: bool,
    features: &'static [DialectFeature],
}

impl Default for DialectInfo {
    fn default() -> Self {
        Self::generic()
    }
}

impl DialectInfo {
    /// Generic SQL-standard dialect: double-quoted identifiers, no
    /// optional features.
    pub fn generic() -> Self {
        Self {
            id: Cow::Borrowed("generic"),
            display_name: Cow::Borrowed("SQL"),
            identifier_quote: '"',
            close_quote: '"',
            statement_terminator: ';',
            case_sensitive_identifiers: false,
            features: &[DialectFeature::IfExists],
        }
    }

    pub fn postgres() -> Self {
        Self {
            id: Cow::Borrowed("postgresql"),
            display_name: Cow::Borrowed("PostgreSQL"),
            identifier_quote: '"',
            close_quote: '"',
            statement_terminator: ';',
            case_sensitive_identifiers: true,
            features: &[
                DialectFeature::RenameConstraint,
                DialectFeature::RenameColumn,
                DialectFeature::DropCascade,
                DialectFeature::AlterColumnType,
                DialectFeature::CreateOrReplace,
                DialectFeature::IfExists,
                DialectFeature::CommentOn,
                DialectFeature::AtomicDatabaseDdl,
            ],
        }
    }

    pub fn mysql() -> Self {
        Self {
            id: Cow::Borrowed("mysql"),
            display_name: Cow::Borrowed("MySQL"),
            identifier_quote: '`',
            close_quote: '`',
            statement_terminator: ';',
            case_sensitive_identifiers: false,
            features: &[
                DialectFeature::RenameColumn,
                DialectFeature::AlterColumnType,
                DialectFeature::CreateOrReplace,
                DialectFeature::IfExists,
            ],
        }
    }

    pub fn sqlite() -> Self {
        Self {
            id: Cow::Borrowed("sqlite"),
            display_name: Cow::Borrowed("SQLite"),
            identifier_quote: '"',
            close_quote: '"',
            statement_terminator: ';',
            case_sensitive_identifiers: false,
            features: &[DialectFeature::RenameColumn, DialectFeature::IfExists],
        }
    }

    /// Check whether this dialect supports a DDL feature.
    pub fn supports(&self, feature: DialectFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Wrap an identifier in the dialect's quote characters.
    pub fn quote_identifier(&self, name: &str) -> String {
        format!("{}{}{}", self.identifier_quote, name, self.close_quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_features() {
        let d = DialectInfo::postgres();
        assert!(d.supports(DialectFeature::RenameConstraint));
        assert!(d.supports(DialectFeature::DropCascade));
        assert!(d.supports(DialectFeature::AtomicDatabaseDdl));
    }

    #[test]
    fn test_mysql_no_rename_constraint() {
        let d = DialectInfo::mysql();
        assert!(!d.supports(DialectFeature::RenameConstraint));
        assert!(d.supports(DialectFeature::RenameColumn));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(DialectInfo::postgres().quote_identifier("t"), "\"t\"");
        assert_eq!(DialectInfo::mysql().quote_identifier("t"), "`t`");
    }
}

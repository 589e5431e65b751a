//! Port for reference-data membership checks.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{EnumName, Error};

/// Port answering whether a code belongs to a reference set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnumRepository<Tx: Send + Sync + 'static>: Send + Sync {
    /// Whether `code` is a member of the `name` reference set.
    async fn exists(&self, tx: &mut Tx, name: EnumName, code: &str) -> Result<bool, Error>;
}

/// In-memory reference data.
#[derive(Debug, Clone, Default)]
pub struct FixtureEnumRepository {
    codes: BTreeSet<(EnumName, String)>,
}

impl FixtureEnumRepository {
    /// Reference data containing exactly `codes`.
    pub fn with_codes<'a>(codes: impl IntoIterator<Item = (EnumName, &'a str)>) -> Self {
        Self {
            codes: codes
                .into_iter()
                .map(|(name, code)| (name, code.to_owned()))
                .collect(),
        }
    }

    /// The same codes the database migrations seed.
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_codes([
            (EnumName::Currency, "GBP"),
            (EnumName::Currency, "EUR"),
            (EnumName::Currency, "USD"),
            (EnumName::Country, "GB"),
            (EnumName::Country, "DE"),
            (EnumName::Country, "FR"),
            (EnumName::Country, "US"),
            (EnumName::Scheme, "FPS"),
            (EnumName::Scheme, "BACS"),
            (EnumName::Scheme, "SEPA"),
        ])
    }
}

#[async_trait]
impl<Tx: Send + Sync + 'static> EnumRepository<Tx> for FixtureEnumRepository {
    async fn exists(&self, _tx: &mut Tx, name: EnumName, code: &str) -> Result<bool, Error> {
        Ok(self.codes.contains(&(name, code.to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EnumName::Currency, "GBP", true)]
    #[case(EnumName::Currency, "GB", false)]
    #[case(EnumName::Country, "GB", true)]
    #[case(EnumName::Scheme, "FPS", true)]
    #[case(EnumName::Scheme, "fps", false)]
    #[tokio::test]
    async fn seeded_fixture_answers_membership(
        #[case] name: EnumName,
        #[case] code: &str,
        #[case] expected: bool,
    ) {
        let repo = FixtureEnumRepository::seeded();
        let found = repo.exists(&mut (), name, code).await.expect("lookup");
        assert_eq!(found, expected);
    }
}

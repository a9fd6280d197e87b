//! Entity traits: identity and company ownership.

use crate::id::CompanyId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Records owned by exactly one company once created.
///
/// Reads across company boundaries must treat foreign records as missing.
pub trait CompanyScoped {
    /// Owning company; `None` while the record has not been created yet.
    fn owning_company(&self) -> Option<CompanyId>;

    fn belongs_to(&self, company_id: CompanyId) -> bool {
        self.owning_company() == Some(company_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Draft(Option<CompanyId>);

    impl CompanyScoped for Draft {
        fn owning_company(&self) -> Option<CompanyId> {
            self.0
        }
    }

    #[test]
    fn uncreated_records_belong_to_no_company() {
        let company_id = CompanyId::new();
        assert!(!Draft(None).belongs_to(company_id));
        assert!(Draft(Some(company_id)).belongs_to(company_id));
        assert!(!Draft(Some(CompanyId::new())).belongs_to(company_id));
    }
}

//! Category to page-sequence table.
//!
//! Page count and page content are both read from [`pages_for`], so the two
//! can never disagree.

use std::fmt;

use intake_domain::Category;

/// Identifies the field group shown on a wizard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageId {
    Universal,
    ProviderNeeds,
    ProviderPreferences,
    BillingDetails,
    BillingConcerns,
    MedicationDetails,
    PharmacyPreferences,
    ServiceDetails,
    ServiceScheduling,
    Benefits,
    PlanSituation,
    PlanPriorities,
    Question,
    Communication,
}

impl PageId {
    pub fn title(self) -> &'static str {
        match self {
            PageId::Universal => "About your request",
            PageId::ProviderNeeds => "Care you need",
            PageId::ProviderPreferences => "Provider preferences",
            PageId::BillingDetails => "Bill details",
            PageId::BillingConcerns => "Billing concerns",
            PageId::MedicationDetails => "Medication details",
            PageId::PharmacyPreferences => "Pharmacy & concerns",
            PageId::ServiceDetails => "Service details",
            PageId::ServiceScheduling => "Scheduling",
            PageId::Benefits => "Benefits question",
            PageId::PlanSituation => "Your situation",
            PageId::PlanPriorities => "Plan priorities",
            PageId::Question => "Your question",
            PageId::Communication => "Communication preferences",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const UNSET_PAGES: &[PageId] = &[PageId::Universal];
const PROVIDER_PAGES: &[PageId] = &[
    PageId::Universal,
    PageId::ProviderNeeds,
    PageId::ProviderPreferences,
    PageId::Communication,
];
const BILLING_PAGES: &[PageId] = &[
    PageId::Universal,
    PageId::BillingDetails,
    PageId::BillingConcerns,
    PageId::Communication,
];
const MEDICATION_PAGES: &[PageId] = &[
    PageId::Universal,
    PageId::MedicationDetails,
    PageId::PharmacyPreferences,
    PageId::Communication,
];
const SERVICE_PAGES: &[PageId] = &[
    PageId::Universal,
    PageId::ServiceDetails,
    PageId::ServiceScheduling,
    PageId::Communication,
];
const BENEFITS_PAGES: &[PageId] = &[PageId::Universal, PageId::Benefits, PageId::Communication];
const PLAN_PAGES: &[PageId] = &[
    PageId::Universal,
    PageId::PlanSituation,
    PageId::PlanPriorities,
    PageId::Communication,
];
const QUESTION_PAGES: &[PageId] = &[PageId::Universal, PageId::Question, PageId::Communication];

/// Ordered pages for a category. Page 0 is always [`PageId::Universal`] and,
/// once a category is chosen, the last page is always [`PageId::Communication`].
pub fn pages_for(category: Option<Category>) -> &'static [PageId] {
    match category {
        None => UNSET_PAGES,
        Some(Category::Provider) => PROVIDER_PAGES,
        Some(Category::Billing) => BILLING_PAGES,
        Some(Category::Medication) => MEDICATION_PAGES,
        Some(Category::Service) => SERVICE_PAGES,
        Some(Category::Benefits) => BENEFITS_PAGES,
        Some(Category::Plan) => PLAN_PAGES,
        Some(Category::Question) => QUESTION_PAGES,
    }
}

pub fn get_total_pages(category: Option<Category>) -> usize {
    pages_for(category).len()
}

/// Page content for `(category, index)`; `None` outside `0..get_total_pages(category)`.
pub fn page_at(category: Option<Category>, index: usize) -> Option<PageId> {
    pages_for(category).get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn total_pages_match_lookup_table() {
        let expected = [
            (Some(Category::Provider), 4),
            (Some(Category::Billing), 4),
            (Some(Category::Medication), 4),
            (Some(Category::Service), 4),
            (Some(Category::Plan), 4),
            (Some(Category::Benefits), 3),
            (Some(Category::Question), 3),
            (None, 1),
        ];
        for (category, pages) in expected {
            assert_eq!(get_total_pages(category), pages, "{category:?}");
        }
    }

    #[test]
    fn every_page_index_resolves_to_distinct_content() {
        for entry in Category::catalog() {
            let category = Some(entry.category);
            let total = get_total_pages(category);
            let reachable: HashSet<PageId> =
                (0..total).filter_map(|idx| page_at(category, idx)).collect();
            assert_eq!(reachable.len(), total, "{:?}", entry.category);
            assert_eq!(page_at(category, total), None);
            assert_eq!(page_at(category, 0), Some(PageId::Universal));
            assert_eq!(page_at(category, total - 1), Some(PageId::Communication));
        }
    }

    #[test]
    fn benefits_plan_is_universal_benefits_communication() {
        assert_eq!(
            pages_for(Some(Category::Benefits)),
            &[PageId::Universal, PageId::Benefits, PageId::Communication]
        );
    }

    #[test]
    fn middle_pages_belong_to_a_single_category() {
        let mut seen = HashSet::new();
        for entry in Category::catalog() {
            let pages = pages_for(Some(entry.category));
            for page in &pages[1..pages.len() - 1] {
                assert!(seen.insert(*page), "{page:?} reused across categories");
            }
        }
    }
}

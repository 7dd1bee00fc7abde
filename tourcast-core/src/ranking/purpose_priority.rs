use serde::{Deserialize, Serialize};

use crate::model::{PersonCategory, PurposeCategory};

/// maps destination purposes to integer priority ranks for primary
/// purpose determination, per person category. lower rank means higher
/// priority: mandatory activities (work, school) outrank escort, which
/// outranks everything else.
///
/// each list is ordered best-first; a purpose's rank is its 1-based
/// position, and purposes absent from the list share `default_priority`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurposePriority {
    pub worker: Vec<PurposeCategory>,
    pub student: Vec<PurposeCategory>,
    pub other: Vec<PurposeCategory>,
    pub default_priority: u32,
}

impl PurposePriority {
    /// priority rank of a destination purpose for a person category.
    /// lower is better.
    pub fn rank(&self, purpose: PurposeCategory, category: PersonCategory) -> u32 {
        let order = match category {
            PersonCategory::Worker => &self.worker,
            PersonCategory::Student => &self.student,
            PersonCategory::Other => &self.other,
        };
        order
            .iter()
            .position(|p| *p == purpose)
            .map(|idx| idx as u32 + 1)
            .unwrap_or(self.default_priority)
    }
}

impl Default for PurposePriority {
    fn default() -> Self {
        PurposePriority {
            worker: vec![
                PurposeCategory::Work,
                PurposeCategory::School,
                PurposeCategory::Escort,
            ],
            student: vec![
                PurposeCategory::School,
                PurposeCategory::Work,
                PurposeCategory::Escort,
            ],
            other: vec![
                PurposeCategory::Work,
                PurposeCategory::School,
                PurposeCategory::Escort,
            ],
            default_priority: 4,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_worker_ranks_work_first() {
        let priority = PurposePriority::default();
        let work = priority.rank(PurposeCategory::Work, PersonCategory::Worker);
        let school = priority.rank(PurposeCategory::School, PersonCategory::Worker);
        let errand = priority.rank(PurposeCategory::Errand, PersonCategory::Worker);
        assert!(work < school);
        assert!(school < errand);
    }

    #[test]
    fn test_student_ranks_school_first() {
        let priority = PurposePriority::default();
        let school = priority.rank(PurposeCategory::School, PersonCategory::Student);
        let work = priority.rank(PurposeCategory::Work, PersonCategory::Student);
        assert!(school < work);
    }

    #[test]
    fn test_unlisted_purposes_share_default_rank() {
        let priority = PurposePriority::default();
        let shop = priority.rank(PurposeCategory::Shop, PersonCategory::Worker);
        let errand = priority.rank(PurposeCategory::Errand, PersonCategory::Worker);
        assert_eq!(shop, errand);
        assert_eq!(shop, priority.default_priority);
    }
}

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Gender, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ProfileService {
    async fn get_profile(&self) -> Result<Profile, ReadError>;
    async fn update_profile(&self, profile: Profile) -> Result<Profile, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait ProfileRepository {
    async fn read_profile(&self) -> Result<Profile, ReadError>;
    async fn update_profile(&self, profile: Profile) -> Result<Profile, UpdateError>;
}

/// Personal data used for plan generation. Height in cm, weight in kg.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub gender: Gender,
    pub height: f32,
    pub weight: f32,
    pub goal: Goal,
    pub experience: Experience,
    pub days_per_week: u32,
    pub session_minutes: u32,
}

impl Profile {
    pub const AGE: std::ops::RangeInclusive<u32> = 13..=120;
    pub const HEIGHT: std::ops::RangeInclusive<f32> = 100.0..=250.0;
    pub const WEIGHT: std::ops::RangeInclusive<f32> = 30.0..=300.0;
    pub const DAYS_PER_WEEK: std::ops::RangeInclusive<u32> = 1..=7;
    pub const SESSION_MINUTES: std::ops::RangeInclusive<u32> = 15..=180;
}

#[derive(AsRefStr, Display, EnumIter, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    BuildMuscle,
    GetStronger,
    ImproveEndurance,
    StayHealthy,
}

#[derive(AsRefStr, Display, EnumIter, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case("lose_weight", Ok(Goal::LoseWeight))]
    #[case("build_muscle", Ok(Goal::BuildMuscle))]
    #[case("stay_healthy", Ok(Goal::StayHealthy))]
    #[case("relax", Err(strum::ParseError::VariantNotFound))]
    fn test_goal_from_str(#[case] value: &str, #[case] expected: Result<Goal, strum::ParseError>) {
        assert_eq!(Goal::from_str(value), expected);
    }

    #[test]
    fn test_goal_variants() {
        assert_eq!(Goal::iter().count(), 5);
    }

    #[rstest]
    #[case(Experience::Beginner, "beginner")]
    #[case(Experience::Intermediate, "intermediate")]
    #[case(Experience::Advanced, "advanced")]
    fn test_experience_display(#[case] experience: Experience, #[case] string: &str) {
        assert_eq!(experience.to_string(), string);
        assert_eq!(experience.as_ref(), string);
    }
}

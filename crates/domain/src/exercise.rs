use derive_more::{Deref, Display, From};

use crate::{Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
}

impl Exercise {
    /// Case-insensitive match of every search term against name, muscle group and equipment.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let name = self.name.to_string();
        let haystack = [
            Some(name.as_str()),
            self.muscle_group.as_deref(),
            self.equipment.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
        query
            .to_lowercase()
            .split_whitespace()
            .all(|term| haystack.contains(term))
    }
}

/// Exercises matching `query`, sorted by name.
#[must_use]
pub fn filter_exercises<'a>(exercises: &'a [Exercise], query: &str) -> Vec<&'a Exercise> {
    let mut result = exercises
        .iter()
        .filter(|e| e.matches(query))
        .collect::<Vec<_>>();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseID(u32);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercises() -> Vec<Exercise> {
        vec![
            Exercise {
                id: 1.into(),
                name: Name::new("Squat").unwrap(),
                muscle_group: Some("Legs".to_string()),
                equipment: Some("Barbell".to_string()),
            },
            Exercise {
                id: 2.into(),
                name: Name::new("Goblet Squat").unwrap(),
                muscle_group: Some("Legs".to_string()),
                equipment: Some("Dumbbell".to_string()),
            },
            Exercise {
                id: 3.into(),
                name: Name::new("Bench Press").unwrap(),
                muscle_group: Some("Chest".to_string()),
                equipment: None,
            },
        ]
    }

    #[rstest]
    #[case("", vec![3, 2, 1])]
    #[case("squat", vec![2, 1])]
    #[case("SQUAT dumbbell", vec![2])]
    #[case("chest", vec![3])]
    #[case("rowing", vec![])]
    fn test_filter_exercises(#[case] query: &str, #[case] expected: Vec<u32>) {
        let exercises = exercises();
        assert_eq!(
            filter_exercises(&exercises, query)
                .iter()
                .map(|e| *e.id)
                .collect::<Vec<_>>(),
            expected
        );
    }
}

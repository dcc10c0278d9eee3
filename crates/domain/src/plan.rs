use std::collections::BTreeMap;

use derive_more::{Deref, Display, From};

use crate::{Name, ReadError, TemplateID, UpdateError};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn get_programs(&self) -> Result<Vec<Program>, ReadError>;
    async fn update_program(&self, program: Program) -> Result<Program, UpdateError>;

    async fn get_active_plan(&self) -> Result<Option<Plan>, ReadError> {
        Ok(self.get_plans().await?.into_iter().find(|p| p.active))
    }
}

#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    async fn read_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn read_programs(&self) -> Result<Vec<Program>, ReadError>;
    async fn update_program(&self, program: Program) -> Result<Program, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanID,
    pub name: Name,
    pub description: String,
    pub active: bool,
    pub program_id: Option<ProgramID>,
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanID(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: ProgramID,
    pub name: Name,
    pub weeks: u32,
    pub workouts: Vec<ProgramWorkout>,
}

impl Program {
    /// Workouts grouped by week, ordered inside each week.
    ///
    /// Weeks without workouts are included up to the program length.
    #[must_use]
    pub fn weeks(&self) -> Vec<(u32, Vec<&ProgramWorkout>)> {
        let mut weeks = (1..=self.weeks)
            .map(|week| (week, vec![]))
            .collect::<BTreeMap<_, Vec<&ProgramWorkout>>>();
        for workout in &self.workouts {
            weeks.entry(workout.week).or_default().push(workout);
        }
        weeks
            .into_iter()
            .map(|(week, mut workouts)| {
                workouts.sort_by_key(|w| w.order);
                (week, workouts)
            })
            .collect()
    }
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramID(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramWorkout {
    pub template_id: TemplateID,
    pub name: String,
    pub week: u32,
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn workout(template_id: u32, week: u32, order: u32) -> ProgramWorkout {
        ProgramWorkout {
            template_id: template_id.into(),
            name: format!("Workout {template_id}"),
            week,
            order,
        }
    }

    fn plan(id: u32, active: bool) -> Plan {
        Plan {
            id: id.into(),
            name: Name::new(&format!("Plan {id}")).unwrap(),
            description: String::new(),
            active,
            program_id: None,
        }
    }

    struct MockPlanService {
        plans: Vec<Plan>,
    }

    impl PlanService for MockPlanService {
        async fn get_plans(&self) -> Result<Vec<Plan>, ReadError> {
            Ok(self.plans.clone())
        }

        async fn get_programs(&self) -> Result<Vec<Program>, ReadError> {
            Ok(vec![])
        }

        async fn update_program(&self, program: Program) -> Result<Program, UpdateError> {
            Ok(program)
        }
    }

    #[test]
    fn test_program_weeks() {
        let program = Program {
            id: 1.into(),
            name: Name::new("Strength").unwrap(),
            weeks: 3,
            workouts: vec![
                workout(3, 1, 1),
                workout(1, 1, 0),
                workout(2, 3, 0),
                workout(4, 4, 0),
            ],
        };

        assert_eq!(
            program
                .weeks()
                .iter()
                .map(|(week, workouts)| (
                    *week,
                    workouts.iter().map(|w| *w.template_id).collect::<Vec<_>>()
                ))
                .collect::<Vec<_>>(),
            vec![(1, vec![1, 3]), (2, vec![]), (3, vec![2]), (4, vec![4])]
        );
    }

    #[test]
    fn test_get_active_plan() {
        let service = MockPlanService {
            plans: vec![plan(1, false), plan(2, true)],
        };
        assert_eq!(block_on(service.get_active_plan()).unwrap(), Some(plan(2, true)));

        let service = MockPlanService {
            plans: vec![plan(1, false)],
        };
        assert_eq!(block_on(service.get_active_plan()).unwrap(), None);
    }
}

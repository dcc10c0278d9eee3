use derive_more::{Deref, Display, From};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseID, ExerciseList, Keyed, ListEntry, Name,
    ReadError, Reorder, Targets, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait TemplateService {
    async fn get_template(&self, id: TemplateID) -> Result<WorkoutTemplate, ReadError>;
    async fn add_template_exercise(
        &self,
        id: TemplateID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<TemplateExercise, CreateError>;
    async fn update_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
        targets: Targets,
    ) -> Result<TemplateExercise, UpdateError>;
    async fn remove_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
    ) -> Result<TemplateExerciseID, DeleteError>;
    async fn reorder_template_exercises(
        &self,
        id: TemplateID,
        order: Vec<TemplateExerciseID>,
    ) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait TemplateRepository {
    async fn read_template(&self, id: TemplateID) -> Result<WorkoutTemplate, ReadError>;
    async fn add_template_exercise(
        &self,
        id: TemplateID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<TemplateExercise, CreateError>;
    async fn update_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
        targets: Targets,
    ) -> Result<TemplateExercise, UpdateError>;
    async fn remove_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
    ) -> Result<TemplateExerciseID, DeleteError>;
    async fn reorder_template_exercises(
        &self,
        id: TemplateID,
        order: Vec<TemplateExerciseID>,
    ) -> Result<(), UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
    pub id: TemplateID,
    pub name: Name,
    pub exercises: Vec<TemplateExercise>,
}

impl WorkoutTemplate {
    /// Exercises in display order.
    #[must_use]
    pub fn ordered_exercises(&self) -> Vec<TemplateExercise> {
        let mut exercises = self.exercises.clone();
        exercises.sort_by_key(|e| e.order);
        exercises
    }

    #[must_use]
    pub fn contains_exercise(&self, exercise_id: ExerciseID) -> bool {
        self.exercises.iter().any(|e| e.exercise.id == exercise_id)
    }
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateID(u32);

/// Exercise of a template. The ID identifies the pivot row, not the exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub id: TemplateExerciseID,
    pub exercise: Exercise,
    pub order: u32,
    pub targets: Targets,
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateExerciseID(u32);

impl Keyed for TemplateExercise {
    type Key = TemplateExerciseID;

    fn key(&self) -> TemplateExerciseID {
        self.id
    }
}

impl ListEntry for TemplateExercise {
    fn exercise_id(&self) -> ExerciseID {
        self.exercise.id
    }

    fn targets(&self) -> Targets {
        self.targets
    }
}

/// Exercise list of a workout template.
pub struct TemplateExercises<'a, S> {
    pub service: &'a S,
    pub template_id: TemplateID,
}

impl<S: TemplateService> Reorder for TemplateExercises<'_, S> {
    type Key = TemplateExerciseID;

    async fn reorder(&self, order: Vec<TemplateExerciseID>) -> Result<(), UpdateError> {
        self.service
            .reorder_template_exercises(self.template_id, order)
            .await
    }
}

impl<S: TemplateService> ExerciseList for TemplateExercises<'_, S> {
    type Entry = TemplateExercise;

    async fn entries(&self) -> Result<Vec<TemplateExercise>, ReadError> {
        Ok(self
            .service
            .get_template(self.template_id)
            .await?
            .ordered_exercises())
    }

    async fn add(
        &self,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<(), CreateError> {
        self.service
            .add_template_exercise(self.template_id, exercise_id, order, targets)
            .await
            .map(|_| ())
    }

    async fn update(&self, key: TemplateExerciseID, targets: Targets) -> Result<(), UpdateError> {
        self.service
            .update_template_exercise(self.template_id, key, targets)
            .await
            .map(|_| ())
    }

    async fn remove(&self, key: TemplateExerciseID) -> Result<(), DeleteError> {
        self.service
            .remove_template_exercise(self.template_id, key)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ReorderList, swap_exercise};

    fn template_exercise(pivot: u32, exercise: u32, order: u32) -> TemplateExercise {
        TemplateExercise {
            id: pivot.into(),
            exercise: Exercise {
                id: exercise.into(),
                name: Name::new(&format!("Exercise {exercise}")).unwrap(),
                muscle_group: Some("legs".to_string()),
                equipment: None,
            },
            order,
            targets: Targets {
                sets: 3,
                reps: 10,
                weight: 0.0,
            },
        }
    }

    struct MockTemplateService {
        template: RefCell<WorkoutTemplate>,
        reorders: RefCell<Vec<(TemplateID, Vec<TemplateExerciseID>)>>,
    }

    impl MockTemplateService {
        fn new(exercises: Vec<TemplateExercise>) -> Self {
            Self {
                template: RefCell::new(WorkoutTemplate {
                    id: 5.into(),
                    name: Name::new("Lower").unwrap(),
                    exercises,
                }),
                reorders: RefCell::new(vec![]),
            }
        }
    }

    impl TemplateService for MockTemplateService {
        async fn get_template(&self, id: TemplateID) -> Result<WorkoutTemplate, ReadError> {
            let template = self.template.borrow().clone();
            if template.id == id {
                Ok(template)
            } else {
                Err(ReadError::NotFound)
            }
        }

        async fn add_template_exercise(
            &self,
            _: TemplateID,
            exercise_id: ExerciseID,
            _: usize,
            targets: Targets,
        ) -> Result<TemplateExercise, CreateError> {
            let mut template = self.template.borrow_mut();
            let order = u32::try_from(template.exercises.len()).unwrap();
            let mut exercise = template_exercise(50 + order, *exercise_id, order);
            exercise.targets = targets;
            template.exercises.push(exercise.clone());
            Ok(exercise)
        }

        async fn update_template_exercise(
            &self,
            _: TemplateID,
            template_exercise_id: TemplateExerciseID,
            targets: Targets,
        ) -> Result<TemplateExercise, UpdateError> {
            let mut template = self.template.borrow_mut();
            let exercise = template
                .exercises
                .iter_mut()
                .find(|e| e.id == template_exercise_id)
                .ok_or(UpdateError::NotFound)?;
            exercise.targets = targets;
            Ok(exercise.clone())
        }

        async fn remove_template_exercise(
            &self,
            _: TemplateID,
            template_exercise_id: TemplateExerciseID,
        ) -> Result<TemplateExerciseID, DeleteError> {
            self.template
                .borrow_mut()
                .exercises
                .retain(|e| e.id != template_exercise_id);
            Ok(template_exercise_id)
        }

        async fn reorder_template_exercises(
            &self,
            id: TemplateID,
            order: Vec<TemplateExerciseID>,
        ) -> Result<(), UpdateError> {
            for exercise in &mut self.template.borrow_mut().exercises {
                if let Some(position) = order.iter().position(|p| *p == exercise.id) {
                    exercise.order = u32::try_from(position).unwrap();
                }
            }
            self.reorders.borrow_mut().push((id, order));
            Ok(())
        }
    }

    #[test]
    fn test_ordered_exercises() {
        let template = WorkoutTemplate {
            id: 1.into(),
            name: Name::new("Upper").unwrap(),
            exercises: vec![
                template_exercise(11, 1, 2),
                template_exercise(12, 2, 0),
                template_exercise(13, 3, 1),
            ],
        };

        assert_eq!(
            template
                .ordered_exercises()
                .iter()
                .map(|e| *e.id)
                .collect::<Vec<_>>(),
            vec![12, 13, 11]
        );
        assert!(template.contains_exercise(3.into()));
        assert!(!template.contains_exercise(4.into()));
    }

    #[test]
    fn test_reorder_template_by_pivot() {
        let service = MockTemplateService::new(vec![
            template_exercise(11, 1, 0),
            template_exercise(12, 2, 1),
        ]);
        let list = TemplateExercises {
            service: &service,
            template_id: 5.into(),
        };
        let buffer = ReorderList::new(block_on(list.entries()).unwrap());

        buffer.move_item(1, 0).unwrap();
        block_on(buffer.commit(&list)).unwrap();

        assert_eq!(
            *service.reorders.borrow(),
            vec![(
                TemplateID::from(5),
                vec![TemplateExerciseID::from(12), TemplateExerciseID::from(11)]
            )]
        );

        buffer.initialize(block_on(list.entries()).unwrap());
        assert_eq!(
            buffer.items().iter().map(|e| *e.id).collect::<Vec<_>>(),
            vec![12, 11]
        );
    }

    #[test]
    fn test_swap_template_exercise() {
        let service = MockTemplateService::new(vec![
            template_exercise(11, 1, 0),
            template_exercise(12, 2, 1),
            template_exercise(13, 3, 2),
        ]);
        let list = TemplateExercises {
            service: &service,
            template_id: 5.into(),
        };

        let view = ReorderList::new(block_on(list.entries()).unwrap());

        let result = block_on(swap_exercise(&list, &view, 11.into(), 9.into())).unwrap();

        assert_eq!(
            result.iter().map(|e| *e.exercise.id).collect::<Vec<_>>(),
            vec![9, 2, 3]
        );
        assert_eq!(service.reorders.borrow().len(), 1);
        assert_eq!(
            block_on(list.entries())
                .unwrap()
                .iter()
                .map(|e| *e.exercise.id)
                .collect::<Vec<_>>(),
            vec![9, 2, 3]
        );
    }
}

use chrono::{DateTime, Duration, NaiveDate, Utc};
use derive_more::{Deref, Display, From};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseID, ExerciseList, Keyed, ListEntry, ReadError,
    Reorder, TemplateID, Targets, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionService {
    async fn get_session(&self, id: SessionID) -> Result<WorkoutSession, ReadError>;
    async fn start_session(&self, template_id: TemplateID) -> Result<WorkoutSession, CreateError>;
    async fn complete_session(
        &self,
        id: SessionID,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn cancel_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError>;
    async fn confirm_draft_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError>;
    async fn regenerate_draft_session(&self, id: SessionID)
    -> Result<WorkoutSession, UpdateError>;
    async fn add_session_exercise(
        &self,
        id: SessionID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<SessionExercise, CreateError>;
    async fn update_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        targets: Targets,
    ) -> Result<SessionExercise, UpdateError>;
    async fn remove_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
    ) -> Result<SessionExerciseID, DeleteError>;
    async fn reorder_session_exercises(
        &self,
        id: SessionID,
        order: Vec<SessionExerciseID>,
    ) -> Result<(), UpdateError>;
    async fn log_set(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        reps: u32,
        weight: f32,
    ) -> Result<LoggedSet, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionRepository {
    async fn read_session(&self, id: SessionID) -> Result<WorkoutSession, ReadError>;
    async fn start_session(&self, template_id: TemplateID) -> Result<WorkoutSession, CreateError>;
    async fn complete_session(
        &self,
        id: SessionID,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn cancel_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError>;
    async fn confirm_draft_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError>;
    async fn regenerate_draft_session(&self, id: SessionID)
    -> Result<WorkoutSession, UpdateError>;
    async fn add_session_exercise(
        &self,
        id: SessionID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<SessionExercise, CreateError>;
    async fn update_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        targets: Targets,
    ) -> Result<SessionExercise, UpdateError>;
    async fn remove_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
    ) -> Result<SessionExerciseID, DeleteError>;
    async fn reorder_session_exercises(
        &self,
        id: SessionID,
        order: Vec<SessionExerciseID>,
    ) -> Result<(), UpdateError>;
    async fn log_set(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        reps: u32,
        weight: f32,
    ) -> Result<LoggedSet, CreateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: SessionID,
    pub template_id: Option<TemplateID>,
    pub name: String,
    pub date: NaiveDate,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Duration in seconds as stored on completion.
    pub duration: Option<u32>,
    pub notes: String,
    pub exercises: Vec<SessionExerciseDetail>,
}

impl WorkoutSession {
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status == SessionStatus::Draft
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Time spent in the session.
    ///
    /// Sessions without completion time are still running, so the duration grows with `now`.
    /// Completed sessions report the stored duration. A session that has not been started yet
    /// (a draft) reports zero, so the duration only increases once `started_at` is set.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match (self.started_at, self.completed_at) {
            (_, Some(completed_at)) => match self.duration {
                Some(duration) => Duration::seconds(i64::from(duration)),
                None => self
                    .started_at
                    .map_or(Duration::zero(), |started_at| completed_at - started_at)
                    .max(Duration::zero()),
            },
            (Some(started_at), None) => (now - started_at).max(Duration::zero()),
            (None, None) => Duration::zero(),
        }
    }

    #[must_use]
    pub fn logged_sets(&self) -> u32 {
        self.exercises
            .iter()
            .map(SessionExerciseDetail::logged_sets)
            .sum()
    }

    #[must_use]
    pub fn target_sets(&self) -> u32 {
        self.exercises
            .iter()
            .map(|e| e.exercise.targets.sets)
            .sum()
    }

    /// Share of target sets that have been logged, between 0 and 1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let target = self.target_sets();
        if target == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let progress = self.logged_sets() as f32 / target as f32;
        progress.min(1.0)
    }
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionID(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl TryFrom<&str> for SessionStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(SessionStatus::Draft),
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            _ => Err(format!("unknown session status: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub id: SessionExerciseID,
    pub exercise: Exercise,
    pub order: u32,
    pub targets: Targets,
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionExerciseID(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub id: LoggedSetID,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f32,
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoggedSetID(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExerciseDetail {
    pub exercise: SessionExercise,
    pub sets: Vec<LoggedSet>,
}

impl SessionExerciseDetail {
    #[must_use]
    pub fn logged_sets(&self) -> u32 {
        u32::try_from(self.sets.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.logged_sets() >= self.exercise.targets.sets
    }

    #[must_use]
    pub fn next_set_number(&self) -> u32 {
        self.sets.iter().map(|s| s.set_number).max().unwrap_or(0) + 1
    }
}

impl Keyed for SessionExerciseDetail {
    type Key = SessionExerciseID;

    fn key(&self) -> SessionExerciseID {
        self.exercise.id
    }
}

impl ListEntry for SessionExerciseDetail {
    fn exercise_id(&self) -> ExerciseID {
        self.exercise.exercise.id
    }

    fn targets(&self) -> Targets {
        self.exercise.targets
    }
}

/// Exercise list of a workout session.
pub struct SessionExercises<'a, S> {
    pub service: &'a S,
    pub session_id: SessionID,
}

impl<S: WorkoutSessionService> Reorder for SessionExercises<'_, S> {
    type Key = SessionExerciseID;

    async fn reorder(&self, order: Vec<SessionExerciseID>) -> Result<(), UpdateError> {
        self.service
            .reorder_session_exercises(self.session_id, order)
            .await
    }
}

impl<S: WorkoutSessionService> ExerciseList for SessionExercises<'_, S> {
    type Entry = SessionExerciseDetail;

    async fn entries(&self) -> Result<Vec<SessionExerciseDetail>, ReadError> {
        let mut exercises = self.service.get_session(self.session_id).await?.exercises;
        exercises.sort_by_key(|e| e.exercise.order);
        Ok(exercises)
    }

    async fn add(
        &self,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<(), CreateError> {
        self.service
            .add_session_exercise(self.session_id, exercise_id, order, targets)
            .await
            .map(|_| ())
    }

    async fn update(&self, key: SessionExerciseID, targets: Targets) -> Result<(), UpdateError> {
        self.service
            .update_session_exercise(self.session_id, key, targets)
            .await
            .map(|_| ())
    }

    async fn remove(&self, key: SessionExerciseID) -> Result<(), DeleteError> {
        self.service
            .remove_session_exercise(self.session_id, key)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::Name;

    fn time(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn detail(id: u32, target_sets: u32, logged: u32) -> SessionExerciseDetail {
        SessionExerciseDetail {
            exercise: SessionExercise {
                id: id.into(),
                exercise: Exercise {
                    id: (id * 10).into(),
                    name: Name::new("Squat").unwrap(),
                    muscle_group: None,
                    equipment: None,
                },
                order: id,
                targets: Targets {
                    sets: target_sets,
                    reps: 8,
                    weight: 60.0,
                },
            },
            sets: (1..=logged)
                .map(|n| LoggedSet {
                    id: n.into(),
                    set_number: n,
                    reps: 8,
                    weight: 60.0,
                })
                .collect(),
        }
    }

    fn session(
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        duration: Option<u32>,
    ) -> WorkoutSession {
        WorkoutSession {
            id: 1.into(),
            template_id: Some(2.into()),
            name: "Push".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: if completed_at.is_some() {
                SessionStatus::Completed
            } else {
                SessionStatus::InProgress
            },
            started_at,
            completed_at,
            duration,
            notes: String::new(),
            exercises: vec![detail(1, 3, 3), detail(2, 4, 1)],
        }
    }

    #[test]
    fn test_elapsed_running_session_increases() {
        let session = session(Some(time(10, 0, 0)), None, None);

        let first = session.elapsed(time(10, 5, 0));
        let second = session.elapsed(time(10, 5, 2));
        let third = session.elapsed(time(10, 5, 4));

        assert_eq!(first, Duration::minutes(5));
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_elapsed_completed_session_is_fixed() {
        let session = session(Some(time(10, 0, 0)), Some(time(11, 0, 0)), Some(3000));

        assert_eq!(session.elapsed(time(11, 0, 0)), Duration::seconds(3000));
        assert_eq!(session.elapsed(time(18, 0, 0)), Duration::seconds(3000));
    }

    #[rstest]
    #[case(Some(time(10, 0, 0)), Some(time(10, 45, 0)), Duration::minutes(45))]
    #[case(None, Some(time(10, 45, 0)), Duration::zero())]
    #[case(None, None, Duration::zero())]
    fn test_elapsed_without_stored_duration(
        #[case] started_at: Option<DateTime<Utc>>,
        #[case] completed_at: Option<DateTime<Utc>>,
        #[case] expected: Duration,
    ) {
        assert_eq!(
            session(started_at, completed_at, None).elapsed(time(12, 0, 0)),
            expected
        );
    }

    #[test]
    fn test_elapsed_draft_session_stays_zero() {
        let session = session(None, None, None);

        assert_eq!(session.elapsed(time(10, 0, 0)), Duration::zero());
        assert_eq!(session.elapsed(time(11, 0, 0)), Duration::zero());
    }

    #[test]
    fn test_elapsed_start_in_future() {
        let session = session(Some(time(12, 0, 0)), None, None);

        assert_eq!(session.elapsed(time(11, 59, 0)), Duration::zero());
    }

    #[test]
    fn test_progress() {
        let session = session(Some(time(10, 0, 0)), None, None);

        assert_eq!(session.logged_sets(), 4);
        assert_eq!(session.target_sets(), 7);
        assert_approx_eq!(session.progress(), 4.0 / 7.0);
        assert!(session.exercises[0].is_done());
        assert!(!session.exercises[1].is_done());
        assert_eq!(session.exercises[1].next_set_number(), 2);
    }

    #[rstest]
    #[case("draft", Ok(SessionStatus::Draft))]
    #[case("in_progress", Ok(SessionStatus::InProgress))]
    #[case("completed", Ok(SessionStatus::Completed))]
    #[case("cancelled", Ok(SessionStatus::Cancelled))]
    #[case("paused", Err("unknown session status: paused".to_string()))]
    fn test_session_status_try_from(
        #[case] value: &str,
        #[case] expected: Result<SessionStatus, String>,
    ) {
        assert_eq!(SessionStatus::try_from(value), expected);
    }

    #[test]
    fn test_session_exercise_detail_key() {
        let detail = detail(3, 3, 0);

        assert_eq!(detail.key(), SessionExerciseID::from(3));
        assert_eq!(detail.exercise_id(), ExerciseID::from(30));
    }
}

use log::{debug, error};

use crate::{
    AuthRepository, AuthService, CreateError, Credentials, DeleteError, Exercise, ExerciseID,
    ExerciseRepository, ExerciseService, Invitation, LoggedSet, OnboardingRepository,
    OnboardingService, Plan, PlanRepository, PlanService, Profile, ProfileRepository,
    ProfileService, Program, ReadError, Registration, SessionExercise, SessionExerciseID,
    SessionID, TemplateExercise, TemplateExerciseID, TemplateID, TemplateRepository,
    TemplateService, Targets, UpdateError, User, WorkoutSession, WorkoutSessionRepository,
    WorkoutSessionService, WorkoutTemplate,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(
                    crate::StorageError::NoConnection | crate::StorageError::NoSession,
                ) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: AuthRepository> AuthService for Service<R> {
    async fn get_current_user(&self) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.read_current_user(),
            ReadError,
            "get",
            "current user"
        )
    }

    async fn login(&self, credentials: Credentials) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.login(credentials),
            ReadError,
            "log in",
            "user"
        )
    }

    async fn logout(&self) -> Result<(), DeleteError> {
        log_on_error!(self.repository.logout(), DeleteError, "log out", "user")
    }

    async fn register(&self, registration: Registration) -> Result<User, CreateError> {
        log_on_error!(
            self.repository.register(registration),
            CreateError,
            "register",
            "user"
        )
    }

    async fn validate_invitation(&self, code: &str) -> Result<Invitation, ReadError> {
        log_on_error!(
            self.repository.read_invitation(code),
            ReadError,
            "validate",
            "invitation"
        )
    }
}

impl<R: ProfileRepository> ProfileService for Service<R> {
    async fn get_profile(&self) -> Result<Profile, ReadError> {
        log_on_error!(self.repository.read_profile(), ReadError, "get", "profile")
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile, UpdateError> {
        log_on_error!(
            self.repository.update_profile(profile),
            UpdateError,
            "update",
            "profile"
        )
    }
}

impl<R: OnboardingRepository> OnboardingService for Service<R> {
    async fn complete_onboarding(&self) -> Result<(), CreateError> {
        log_on_error!(
            self.repository.complete_onboarding(),
            CreateError,
            "complete",
            "onboarding"
        )
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }
}

impl<R: PlanRepository> PlanService for Service<R> {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError> {
        log_on_error!(self.repository.read_plans(), ReadError, "get", "plans")
    }

    async fn get_programs(&self) -> Result<Vec<Program>, ReadError> {
        log_on_error!(
            self.repository.read_programs(),
            ReadError,
            "get",
            "programs"
        )
    }

    async fn update_program(&self, program: Program) -> Result<Program, UpdateError> {
        log_on_error!(
            self.repository.update_program(program),
            UpdateError,
            "update",
            "program"
        )
    }
}

impl<R: TemplateRepository> TemplateService for Service<R> {
    async fn get_template(&self, id: TemplateID) -> Result<WorkoutTemplate, ReadError> {
        log_on_error!(
            self.repository.read_template(id),
            ReadError,
            "get",
            "template"
        )
    }

    async fn add_template_exercise(
        &self,
        id: TemplateID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<TemplateExercise, CreateError> {
        log_on_error!(
            self.repository
                .add_template_exercise(id, exercise_id, order, targets),
            CreateError,
            "add",
            "template exercise"
        )
    }

    async fn update_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
        targets: Targets,
    ) -> Result<TemplateExercise, UpdateError> {
        log_on_error!(
            self.repository
                .update_template_exercise(id, template_exercise_id, targets),
            UpdateError,
            "update",
            "template exercise"
        )
    }

    async fn remove_template_exercise(
        &self,
        id: TemplateID,
        template_exercise_id: TemplateExerciseID,
    ) -> Result<TemplateExerciseID, DeleteError> {
        log_on_error!(
            self.repository
                .remove_template_exercise(id, template_exercise_id),
            DeleteError,
            "remove",
            "template exercise"
        )
    }

    async fn reorder_template_exercises(
        &self,
        id: TemplateID,
        order: Vec<TemplateExerciseID>,
    ) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.reorder_template_exercises(id, order),
            UpdateError,
            "reorder",
            "template exercises"
        )
    }
}

impl<R: WorkoutSessionRepository> WorkoutSessionService for Service<R> {
    async fn get_session(&self, id: SessionID) -> Result<WorkoutSession, ReadError> {
        log_on_error!(
            self.repository.read_session(id),
            ReadError,
            "get",
            "workout session"
        )
    }

    async fn start_session(&self, template_id: TemplateID) -> Result<WorkoutSession, CreateError> {
        log_on_error!(
            self.repository.start_session(template_id),
            CreateError,
            "start",
            "workout session"
        )
    }

    async fn complete_session(
        &self,
        id: SessionID,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError> {
        log_on_error!(
            self.repository.complete_session(id, notes),
            UpdateError,
            "complete",
            "workout session"
        )
    }

    async fn cancel_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError> {
        log_on_error!(
            self.repository.cancel_session(id),
            UpdateError,
            "cancel",
            "workout session"
        )
    }

    async fn confirm_draft_session(&self, id: SessionID) -> Result<WorkoutSession, UpdateError> {
        log_on_error!(
            self.repository.confirm_draft_session(id),
            UpdateError,
            "confirm",
            "draft session"
        )
    }

    async fn regenerate_draft_session(
        &self,
        id: SessionID,
    ) -> Result<WorkoutSession, UpdateError> {
        log_on_error!(
            self.repository.regenerate_draft_session(id),
            UpdateError,
            "regenerate",
            "draft session"
        )
    }

    async fn add_session_exercise(
        &self,
        id: SessionID,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<SessionExercise, CreateError> {
        log_on_error!(
            self.repository
                .add_session_exercise(id, exercise_id, order, targets),
            CreateError,
            "add",
            "session exercise"
        )
    }

    async fn update_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        targets: Targets,
    ) -> Result<SessionExercise, UpdateError> {
        log_on_error!(
            self.repository
                .update_session_exercise(id, session_exercise_id, targets),
            UpdateError,
            "update",
            "session exercise"
        )
    }

    async fn remove_session_exercise(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
    ) -> Result<SessionExerciseID, DeleteError> {
        log_on_error!(
            self.repository
                .remove_session_exercise(id, session_exercise_id),
            DeleteError,
            "remove",
            "session exercise"
        )
    }

    async fn reorder_session_exercises(
        &self,
        id: SessionID,
        order: Vec<SessionExerciseID>,
    ) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.reorder_session_exercises(id, order),
            UpdateError,
            "reorder",
            "session exercises"
        )
    }

    async fn log_set(
        &self,
        id: SessionID,
        session_exercise_id: SessionExerciseID,
        reps: u32,
        weight: f32,
    ) -> Result<LoggedSet, CreateError> {
        log_on_error!(
            self.repository
                .log_set(id, session_exercise_id, reps, weight),
            CreateError,
            "log",
            "set"
        )
    }
}

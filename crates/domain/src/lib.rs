#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod completion;
mod error;
mod exercise;
mod name;
mod onboarding;
mod plan;
mod profile;
mod reorder;
mod service;
mod swap;
mod target;
mod template;
mod user;
mod workout_session;

pub use completion::{CompletionError, CompletionState, SessionCompletion};
pub use error::{
    CreateError, DeleteError, ReadError, StorageError, UpdateError, ValidationError,
};
pub use exercise::{
    Exercise, ExerciseID, ExerciseRepository, ExerciseService, filter_exercises,
};
pub use name::{Email, EmailError, Name, NameError};
pub use onboarding::{
    Field, FieldError, OnboardingCompletion, OnboardingError, OnboardingForm, OnboardingPhase,
    OnboardingRepository, OnboardingService, OnboardingWizard, Step, StepError, at_least,
};
pub use plan::{Plan, PlanID, PlanRepository, PlanService, Program, ProgramID, ProgramWorkout};
pub use profile::{Experience, Goal, Profile, ProfileRepository, ProfileService};
pub use reorder::{Keyed, Reorder, ReorderBuffer, ReorderError, ReorderList};
pub use service::Service;
pub use swap::{ExerciseList, ListEntry, SwapError, swap_exercise};
pub use target::{TargetEdit, TargetInput, Targets, parse_reps, parse_sets, parse_weight};
pub use template::{
    TemplateExercise, TemplateExerciseID, TemplateExercises, TemplateID, TemplateRepository,
    TemplateService, WorkoutTemplate,
};
pub use user::{
    AuthRepository, AuthService, Credentials, Gender, Invitation, Password, PasswordError,
    Registration, RegistrationError, User, UserID,
};
pub use workout_session::{
    LoggedSet, LoggedSetID, SessionExercise, SessionExerciseDetail, SessionExerciseID,
    SessionExercises, SessionID, SessionStatus, WorkoutSession, WorkoutSessionRepository,
    WorkoutSessionService,
};

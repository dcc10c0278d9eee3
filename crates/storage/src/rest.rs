//! REST
//!
//! JSON API of the server. Every request carries the stored bearer token. Responses are decoded
//! into wire types, which are converted into domain types.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use forma_domain as domain;
use forma_web_app::TokenRepository;
use gloo_net::http::{Method, Request, RequestBuilder, Response};
use log::debug;
use serde_json::json;

use crate::local_storage::Token;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
    pub base_url: String,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            sender: GlooNetSendRequest,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl<S: SendRequest> REST<S> {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = RequestBuilder::new(&format!("{}/{path}", self.base_url))
            .method(method)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        match Token.read_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, request: Result<Request, gloo_net::Error>) -> Result<Response, Failure> {
        let request = request.map_err(|err| Failure::Other(Box::new(err)))?;
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|err| {
                debug!("request failed: {err}");
                Failure::NoConnection
            })?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Failure::Status {
            status,
            message: error_message(status, &response.status_text(), &body),
        })
    }

    async fn fetch<T, R>(&self, request: Result<Request, gloo_net::Error>) -> Result<R, Failure>
    where
        T: for<'de> serde::Deserialize<'de>,
        R: TryFrom<T>,
        <R as TryFrom<T>>::Error: std::error::Error + 'static,
    {
        let response = self.send(request).await?;
        let data = response
            .json::<T>()
            .await
            .map_err(|err| Failure::Other(Box::new(err)))?;
        R::try_from(data).map_err(|err| Failure::Other(Box::new(err)))
    }

    async fn fetch_all<T, R>(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<Vec<R>, Failure>
    where
        T: for<'de> serde::Deserialize<'de>,
        R: TryFrom<T>,
        <R as TryFrom<T>>::Error: std::error::Error + 'static,
    {
        let response = self.send(request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|err| Failure::Other(Box::new(err)))?
            .into_iter()
            .map(|value| R::try_from(value).map_err(|err| Failure::Other(Box::new(err))))
            .collect()
    }

    async fn fetch_no_content(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<(), Failure> {
        self.send(request).await.map(|_| ())
    }

    async fn authenticate(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<domain::User, Failure> {
        let session = self
            .fetch::<Session, Session>(request)
            .await
            .map_err(|failure| match failure {
                Failure::Status {
                    status: 401,
                    message,
                } => Failure::Rejected {
                    status: 401,
                    message,
                },
                failure => failure,
            })?;
        let user =
            domain::User::try_from(session.user).map_err(|err| Failure::Other(Box::new(err)))?;
        Token
            .write_token(&session.token)
            .map_err(|err| Failure::Other(err.into()))?;
        Ok(user)
    }
}

impl<S: SendRequest> domain::AuthRepository for REST<S> {
    async fn read_current_user(&self) -> Result<domain::User, domain::ReadError> {
        Ok(self
            .fetch::<User, domain::User>(self.request(Method::GET, "user").build())
            .await?)
    }

    async fn login(
        &self,
        credentials: domain::Credentials,
    ) -> Result<domain::User, domain::ReadError> {
        Ok(self
            .authenticate(self.request(Method::POST, "auth/login").json(&json!({
                "email": credentials.email.to_string(),
                "password": credentials.password.expose(),
            })))
            .await?)
    }

    async fn logout(&self) -> Result<(), domain::DeleteError> {
        let result = self
            .fetch_no_content(self.request(Method::POST, "auth/logout").build())
            .await;
        Token.delete_token();
        Ok(result?)
    }

    async fn register(
        &self,
        registration: domain::Registration,
    ) -> Result<domain::User, domain::CreateError> {
        Ok(self
            .authenticate(self.request(Method::POST, "auth/register").json(&json!({
                "name": registration.name.to_string(),
                "email": registration.email.to_string(),
                "password": registration.password.expose(),
                "invitation_code": registration.invitation_code,
            })))
            .await?)
    }

    async fn read_invitation(&self, code: &str) -> Result<domain::Invitation, domain::ReadError> {
        Ok(self
            .fetch::<Invitation, domain::Invitation>(
                self.request(Method::GET, &format!("invitations/{}", code.trim()))
                    .build(),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::ProfileRepository for REST<S> {
    async fn read_profile(&self) -> Result<domain::Profile, domain::ReadError> {
        Ok(self
            .fetch::<Profile, domain::Profile>(self.request(Method::GET, "profile").build())
            .await?)
    }

    async fn update_profile(
        &self,
        profile: domain::Profile,
    ) -> Result<domain::Profile, domain::UpdateError> {
        Ok(self
            .fetch::<Profile, domain::Profile>(
                self.request(Method::PUT, "profile")
                    .json(&Profile::from(&profile)),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::OnboardingRepository for REST<S> {
    async fn complete_onboarding(&self) -> Result<(), domain::CreateError> {
        Ok(self
            .fetch_no_content(self.request(Method::POST, "onboarding/complete").build())
            .await?)
    }
}

impl<S: SendRequest> domain::ExerciseRepository for REST<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .fetch_all::<Exercise, domain::Exercise>(
                self.request(Method::GET, "exercises").build(),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::PlanRepository for REST<S> {
    async fn read_plans(&self) -> Result<Vec<domain::Plan>, domain::ReadError> {
        Ok(self
            .fetch_all::<Plan, domain::Plan>(self.request(Method::GET, "plans").build())
            .await?)
    }

    async fn read_programs(&self) -> Result<Vec<domain::Program>, domain::ReadError> {
        Ok(self
            .fetch_all::<Program, domain::Program>(self.request(Method::GET, "programs").build())
            .await?)
    }

    async fn update_program(
        &self,
        program: domain::Program,
    ) -> Result<domain::Program, domain::UpdateError> {
        Ok(self
            .fetch::<Program, domain::Program>(
                self.request(Method::PUT, &format!("programs/{}", program.id))
                    .json(&Program::from(&program)),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::TemplateRepository for REST<S> {
    async fn read_template(
        &self,
        id: domain::TemplateID,
    ) -> Result<domain::WorkoutTemplate, domain::ReadError> {
        Ok(self
            .fetch::<Template, domain::WorkoutTemplate>(
                self.request(Method::GET, &format!("templates/{id}"))
                    .build(),
            )
            .await?)
    }

    async fn add_template_exercise(
        &self,
        id: domain::TemplateID,
        exercise_id: domain::ExerciseID,
        order: usize,
        targets: domain::Targets,
    ) -> Result<domain::TemplateExercise, domain::CreateError> {
        Ok(self
            .fetch::<TemplateExercise, domain::TemplateExercise>(
                self.request(Method::POST, &format!("templates/{id}/exercises"))
                    .json(&json!({
                        "exercise_id": *exercise_id,
                        "order": order,
                        "target_sets": targets.sets,
                        "target_reps": targets.reps,
                        "target_weight": targets.weight,
                    })),
            )
            .await?)
    }

    async fn update_template_exercise(
        &self,
        id: domain::TemplateID,
        template_exercise_id: domain::TemplateExerciseID,
        targets: domain::Targets,
    ) -> Result<domain::TemplateExercise, domain::UpdateError> {
        Ok(self
            .fetch::<TemplateExercise, domain::TemplateExercise>(
                self.request(
                    Method::PATCH,
                    &format!("templates/{id}/exercises/{template_exercise_id}"),
                )
                .json(&target_values(targets)),
            )
            .await?)
    }

    async fn remove_template_exercise(
        &self,
        id: domain::TemplateID,
        template_exercise_id: domain::TemplateExerciseID,
    ) -> Result<domain::TemplateExerciseID, domain::DeleteError> {
        self.fetch_no_content(
            self.request(
                Method::DELETE,
                &format!("templates/{id}/exercises/{template_exercise_id}"),
            )
            .build(),
        )
        .await?;
        Ok(template_exercise_id)
    }

    async fn reorder_template_exercises(
        &self,
        id: domain::TemplateID,
        order: Vec<domain::TemplateExerciseID>,
    ) -> Result<(), domain::UpdateError> {
        Ok(self
            .fetch_no_content(
                self.request(Method::PUT, &format!("templates/{id}/exercises/order"))
                    .json(&json!({ "order": order.iter().map(|id| **id).collect::<Vec<u32>>() })),
            )
            .await?)
    }
}

impl<S: SendRequest> domain::WorkoutSessionRepository for REST<S> {
    async fn read_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::ReadError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::GET, &format!("sessions/{id}")).build(),
            )
            .await?)
    }

    async fn start_session(
        &self,
        template_id: domain::TemplateID,
    ) -> Result<domain::WorkoutSession, domain::CreateError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::POST, "sessions")
                    .json(&json!({ "template_id": *template_id })),
            )
            .await?)
    }

    async fn complete_session(
        &self,
        id: domain::SessionID,
        notes: Option<String>,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::POST, &format!("sessions/{id}/complete"))
                    .json(&json!({ "notes": notes })),
            )
            .await?)
    }

    async fn cancel_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::POST, &format!("sessions/{id}/cancel"))
                    .build(),
            )
            .await?)
    }

    async fn confirm_draft_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::POST, &format!("sessions/{id}/confirm"))
                    .build(),
            )
            .await?)
    }

    async fn regenerate_draft_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        Ok(self
            .fetch::<WorkoutSession, domain::WorkoutSession>(
                self.request(Method::POST, &format!("sessions/{id}/regenerate"))
                    .build(),
            )
            .await?)
    }

    async fn add_session_exercise(
        &self,
        id: domain::SessionID,
        exercise_id: domain::ExerciseID,
        order: usize,
        targets: domain::Targets,
    ) -> Result<domain::SessionExercise, domain::CreateError> {
        Ok(self
            .fetch::<SessionExercise, domain::SessionExerciseDetail>(
                self.request(Method::POST, &format!("sessions/{id}/exercises"))
                    .json(&json!({
                        "exercise_id": *exercise_id,
                        "order": order,
                        "target_sets": targets.sets,
                        "target_reps": targets.reps,
                        "target_weight": targets.weight,
                    })),
            )
            .await?
            .exercise)
    }

    async fn update_session_exercise(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
        targets: domain::Targets,
    ) -> Result<domain::SessionExercise, domain::UpdateError> {
        Ok(self
            .fetch::<SessionExercise, domain::SessionExerciseDetail>(
                self.request(
                    Method::PATCH,
                    &format!("sessions/{id}/exercises/{session_exercise_id}"),
                )
                .json(&target_values(targets)),
            )
            .await?
            .exercise)
    }

    async fn remove_session_exercise(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
    ) -> Result<domain::SessionExerciseID, domain::DeleteError> {
        self.fetch_no_content(
            self.request(
                Method::DELETE,
                &format!("sessions/{id}/exercises/{session_exercise_id}"),
            )
            .build(),
        )
        .await?;
        Ok(session_exercise_id)
    }

    async fn reorder_session_exercises(
        &self,
        id: domain::SessionID,
        order: Vec<domain::SessionExerciseID>,
    ) -> Result<(), domain::UpdateError> {
        Ok(self
            .fetch_no_content(
                self.request(Method::PUT, &format!("sessions/{id}/exercises/order"))
                    .json(&json!({ "order": order.iter().map(|id| **id).collect::<Vec<u32>>() })),
            )
            .await?)
    }

    async fn log_set(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
        reps: u32,
        weight: f32,
    ) -> Result<domain::LoggedSet, domain::CreateError> {
        Ok(self
            .fetch::<LoggedSet, domain::LoggedSet>(
                self.request(
                    Method::POST,
                    &format!("sessions/{id}/exercises/{session_exercise_id}/sets"),
                )
                .json(&json!({ "reps": reps, "weight": weight })),
            )
            .await?)
    }
}

fn target_values(targets: domain::Targets) -> serde_json::Value {
    json!({
        "target_sets": targets.sets,
        "target_reps": targets.reps,
        "target_weight": targets.weight,
    })
}

/// User-visible text of a failed response.
///
/// Uses the `message` of a JSON error body if present, otherwise status code and reason phrase.
#[must_use]
pub fn error_message(status: u16, status_text: &str, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message }) if !message.trim().is_empty() => message.trim().to_string(),
        _ => format!("{status} {status_text}").trim_end().to_string(),
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug)]
enum Failure {
    NoConnection,
    Status { status: u16, message: String },
    /// Credentials refused by the server.
    Rejected { status: u16, message: String },
    Other(Box<dyn std::error::Error>),
}

impl From<Failure> for domain::StorageError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::NoConnection => domain::StorageError::NoConnection,
            Failure::Status { status: 401, .. } => domain::StorageError::NoSession,
            Failure::Status { status, message } | Failure::Rejected { status, message } => {
                domain::StorageError::Response { status, message }
            }
            Failure::Other(err) => domain::StorageError::Other(err),
        }
    }
}

impl From<Failure> for domain::ReadError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Status { status: 404, .. } => domain::ReadError::NotFound,
            Failure::Other(err) => domain::ReadError::Other(err),
            failure => domain::ReadError::Storage(failure.into()),
        }
    }
}

impl From<Failure> for domain::CreateError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Status {
                status: 409,
                message,
            } => domain::CreateError::Conflict(message),
            Failure::Other(err) => domain::CreateError::Other(err),
            failure => domain::CreateError::Storage(failure.into()),
        }
    }
}

impl From<Failure> for domain::UpdateError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Status { status: 404, .. } => domain::UpdateError::NotFound,
            Failure::Status {
                status: 409,
                message,
            } => domain::UpdateError::Conflict(message),
            Failure::Other(err) => domain::UpdateError::Other(err),
            failure => domain::UpdateError::Storage(failure.into()),
        }
    }
}

impl From<Failure> for domain::DeleteError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Status { status: 404, .. } => domain::DeleteError::NotFound,
            Failure::Other(err) => domain::DeleteError::Other(err),
            failure => domain::DeleteError::Storage(failure.into()),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub onboarding_completed: bool,
}

impl From<domain::User> for User {
    fn from(value: domain::User) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::User> for User {
    fn from(value: &domain::User) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            email: value.email.to_string(),
            onboarding_completed: value.onboarding_completed,
        }
    }
}

impl TryFrom<User> for domain::User {
    type Error = UserError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            email: domain::Email::new(&value.email)?,
            onboarding_completed: value.onboarding_completed,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UserError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidEmail(#[from] domain::EmailError),
}

/// Response of login and registration.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub code: String,
    pub email: Option<String>,
    pub valid: bool,
}

impl TryFrom<Invitation> for domain::Invitation {
    type Error = domain::EmailError;

    fn try_from(value: Invitation) -> Result<Self, Self::Error> {
        Ok(Self {
            code: value.code,
            email: value
                .email
                .filter(|email| !email.trim().is_empty())
                .map(|email| domain::Email::new(&email))
                .transpose()?,
            valid: value.valid,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub gender: String,
    pub height: f32,
    pub weight: f32,
    pub goal: String,
    pub experience: String,
    pub days_per_week: u32,
    pub session_minutes: u32,
}

impl From<&domain::Profile> for Profile {
    fn from(value: &domain::Profile) -> Self {
        Self {
            age: value.age,
            gender: value.gender.to_string(),
            height: value.height,
            weight: value.weight,
            goal: value.goal.to_string(),
            experience: value.experience.to_string(),
            days_per_week: value.days_per_week,
            session_minutes: value.session_minutes,
        }
    }
}

impl TryFrom<Profile> for domain::Profile {
    type Error = ProfileError;

    fn try_from(value: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            age: value.age,
            gender: domain::Gender::try_from(value.gender.as_str())
                .map_err(|()| ProfileError::InvalidGender(value.gender.clone()))?,
            height: value.height,
            weight: value.weight,
            goal: domain::Goal::from_str(&value.goal)
                .map_err(|_| ProfileError::InvalidGoal(value.goal.clone()))?,
            experience: domain::Experience::from_str(&value.experience)
                .map_err(|_| ProfileError::InvalidExperience(value.experience.clone()))?,
            days_per_week: value.days_per_week,
            session_minutes: value.session_minutes,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProfileError {
    #[error("invalid gender: {0}")]
    InvalidGender(String),
    #[error("invalid goal: {0}")]
    InvalidGoal(String),
    #[error("invalid experience: {0}")]
    InvalidExperience(String),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle_group: value.muscle_group.clone(),
            equipment: value.equipment.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::NameError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            muscle_group: value.muscle_group,
            equipment: value.equipment,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Template {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
}

impl From<&domain::WorkoutTemplate> for Template {
    fn from(value: &domain::WorkoutTemplate) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            exercises: value.exercises.iter().map(TemplateExercise::from).collect(),
        }
    }
}

impl TryFrom<Template> for domain::WorkoutTemplate {
    type Error = domain::NameError;

    fn try_from(value: Template) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::TemplateExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// Exercise of a template. The ID is the ID of the pivot row.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub id: u32,
    pub exercise: Exercise,
    pub order: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    #[serde(default)]
    pub target_weight: f32,
}

impl From<&domain::TemplateExercise> for TemplateExercise {
    fn from(value: &domain::TemplateExercise) -> Self {
        Self {
            id: *value.id,
            exercise: Exercise::from(&value.exercise),
            order: value.order,
            target_sets: value.targets.sets,
            target_reps: value.targets.reps,
            target_weight: value.targets.weight,
        }
    }
}

impl TryFrom<TemplateExercise> for domain::TemplateExercise {
    type Error = domain::NameError;

    fn try_from(value: TemplateExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise: domain::Exercise::try_from(value.exercise)?,
            order: value.order,
            targets: domain::Targets {
                sets: value.target_sets,
                reps: value.target_reps,
                weight: value.target_weight,
            },
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: u32,
    pub template_id: Option<u32>,
    pub name: String,
    pub date: NaiveDate,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
}

impl From<&domain::WorkoutSession> for WorkoutSession {
    fn from(value: &domain::WorkoutSession) -> Self {
        Self {
            id: *value.id,
            template_id: value.template_id.map(|id| *id),
            name: value.name.clone(),
            date: value.date,
            status: match value.status {
                domain::SessionStatus::Draft => "draft",
                domain::SessionStatus::InProgress => "in_progress",
                domain::SessionStatus::Completed => "completed",
                domain::SessionStatus::Cancelled => "cancelled",
            }
            .to_string(),
            started_at: value.started_at,
            completed_at: value.completed_at,
            duration: value.duration,
            notes: Some(value.notes.clone()).filter(|notes| !notes.is_empty()),
            exercises: value.exercises.iter().map(SessionExercise::from).collect(),
        }
    }
}

impl TryFrom<WorkoutSession> for domain::WorkoutSession {
    type Error = WorkoutSessionError;

    fn try_from(value: WorkoutSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            template_id: value.template_id.map(domain::TemplateID::from),
            name: value.name,
            date: value.date,
            status: domain::SessionStatus::try_from(value.status.as_str())
                .map_err(WorkoutSessionError::InvalidStatus)?,
            started_at: value.started_at,
            completed_at: value.completed_at,
            duration: value.duration,
            notes: value.notes.unwrap_or_default(),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::SessionExerciseDetail::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutSessionError {
    #[error("{0}")]
    InvalidStatus(String),
    #[error(transparent)]
    InvalidExercise(#[from] domain::NameError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub id: u32,
    pub exercise: Exercise,
    pub order: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    #[serde(default)]
    pub target_weight: f32,
    #[serde(default)]
    pub sets: Vec<LoggedSet>,
}

impl From<&domain::SessionExerciseDetail> for SessionExercise {
    fn from(value: &domain::SessionExerciseDetail) -> Self {
        Self {
            id: *value.exercise.id,
            exercise: Exercise::from(&value.exercise.exercise),
            order: value.exercise.order,
            target_sets: value.exercise.targets.sets,
            target_reps: value.exercise.targets.reps,
            target_weight: value.exercise.targets.weight,
            sets: value.sets.iter().map(LoggedSet::from).collect(),
        }
    }
}

impl TryFrom<SessionExercise> for domain::SessionExerciseDetail {
    type Error = domain::NameError;

    fn try_from(value: SessionExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise: domain::SessionExercise {
                id: value.id.into(),
                exercise: domain::Exercise::try_from(value.exercise)?,
                order: value.order,
                targets: domain::Targets {
                    sets: value.target_sets,
                    reps: value.target_reps,
                    weight: value.target_weight,
                },
            },
            sets: value.sets.into_iter().map(domain::LoggedSet::from).collect(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub id: u32,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f32,
}

impl From<&domain::LoggedSet> for LoggedSet {
    fn from(value: &domain::LoggedSet) -> Self {
        Self {
            id: *value.id,
            set_number: value.set_number,
            reps: value.reps,
            weight: value.weight,
        }
    }
}

impl From<LoggedSet> for domain::LoggedSet {
    fn from(value: LoggedSet) -> Self {
        Self {
            id: value.id.into(),
            set_number: value.set_number,
            reps: value.reps,
            weight: value.weight,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub program_id: Option<u32>,
}

impl From<&domain::Plan> for Plan {
    fn from(value: &domain::Plan) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            description: Some(value.description.clone()),
            active: value.active,
            program_id: value.program_id.map(|id| *id),
        }
    }
}

impl TryFrom<Plan> for domain::Plan {
    type Error = domain::NameError;

    fn try_from(value: Plan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            description: value.description.unwrap_or_default(),
            active: value.active,
            program_id: value.program_id.map(domain::ProgramID::from),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: u32,
    pub name: String,
    pub weeks: u32,
    #[serde(default)]
    pub workouts: Vec<ProgramWorkout>,
}

impl From<&domain::Program> for Program {
    fn from(value: &domain::Program) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            weeks: value.weeks,
            workouts: value
                .workouts
                .iter()
                .map(|workout| ProgramWorkout {
                    template_id: *workout.template_id,
                    name: workout.name.clone(),
                    week: workout.week,
                    order: workout.order,
                })
                .collect(),
        }
    }
}

impl TryFrom<Program> for domain::Program {
    type Error = domain::NameError;

    fn try_from(value: Program) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            weeks: value.weeks,
            workouts: value
                .workouts
                .into_iter()
                .map(|workout| domain::ProgramWorkout {
                    template_id: workout.template_id.into(),
                    name: workout.name,
                    week: workout.week,
                    order: workout.order,
                })
                .collect(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgramWorkout {
    pub template_id: u32,
    pub name: String,
    pub week: u32,
    pub order: u32,
}

use std::{cell::RefCell, future::Future, ops::RangeInclusive, rc::Rc};

use futures_util::future::join;
use log::{debug, error};
use strum::{Display, EnumIter};

use crate::{CreateError, Experience, Gender, Goal, Profile, ProfileService};

#[allow(async_fn_in_trait)]
pub trait OnboardingService {
    /// Marks the onboarding as done and generates the initial plan.
    async fn complete_onboarding(&self) -> Result<(), CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait OnboardingRepository {
    async fn complete_onboarding(&self) -> Result<(), CreateError>;
}

#[derive(Display, EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    PersonalInfo,
    Goals,
    Preferences,
    Complete,
}

impl Step {
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fields that must be valid before leaving this step.
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Welcome | Step::Complete => &[],
            Step::PersonalInfo => &[Field::Age, Field::Gender, Field::Height, Field::Weight],
            Step::Goals => &[Field::Goal, Field::Experience],
            Step::Preferences => &[Field::DaysPerWeek, Field::SessionMinutes],
        }
    }

    fn next(self) -> Self {
        match self {
            Step::Welcome => Step::PersonalInfo,
            Step::PersonalInfo => Step::Goals,
            Step::Goals => Step::Preferences,
            Step::Preferences | Step::Complete => Step::Complete,
        }
    }

    fn previous(self) -> Self {
        match self {
            Step::Welcome | Step::PersonalInfo => Step::Welcome,
            Step::Goals => Step::PersonalInfo,
            Step::Preferences => Step::Goals,
            Step::Complete => Step::Preferences,
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Gender,
    Height,
    Weight,
    Goal,
    Experience,
    #[strum(to_string = "Days per week")]
    DaysPerWeek,
    #[strum(to_string = "Session length")]
    SessionMinutes,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{0} must be a number")]
    Invalid(Field),
    #[error("{0} is out of range")]
    OutOfRange(Field),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("onboarding has no further step")]
    Finished,
    #[error("{} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

impl FieldError {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            FieldError::Required(field)
            | FieldError::Invalid(field)
            | FieldError::OutOfRange(field) => *field,
        }
    }
}

/// Raw wizard input. Numeric text fields are parsed on validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OnboardingForm {
    pub age: String,
    pub gender: Option<Gender>,
    pub height: String,
    pub weight: String,
    pub goal: Option<Goal>,
    pub experience: Option<Experience>,
    pub days_per_week: Option<u32>,
    pub session_minutes: Option<u32>,
}

impl OnboardingForm {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            age: profile.age.to_string(),
            gender: Some(profile.gender),
            height: profile.height.to_string(),
            weight: profile.weight.to_string(),
            goal: Some(profile.goal),
            experience: Some(profile.experience),
            days_per_week: Some(profile.days_per_week),
            session_minutes: Some(profile.session_minutes),
        }
    }

    /// Validates the fields of a single step.
    #[must_use]
    pub fn validate(&self, step: Step) -> Vec<FieldError> {
        step.fields()
            .iter()
            .filter_map(|field| self.check(*field).err())
            .collect()
    }

    pub fn profile(&self) -> Result<Profile, Vec<FieldError>> {
        let errors = [Step::PersonalInfo, Step::Goals, Step::Preferences]
            .into_iter()
            .flat_map(|step| self.validate(step))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(errors);
        }
        let profile = || -> Result<Profile, FieldError> {
            Ok(Profile {
                age: self.age()?,
                gender: required(self.gender, Field::Gender)?,
                height: self.height()?,
                weight: self.weight()?,
                goal: required(self.goal, Field::Goal)?,
                experience: required(self.experience, Field::Experience)?,
                days_per_week: self.days_per_week()?,
                session_minutes: self.session_minutes()?,
            })
        };
        profile().map_err(|err| vec![err])
    }

    fn check(&self, field: Field) -> Result<(), FieldError> {
        match field {
            Field::Age => self.age().map(|_| ()),
            Field::Gender => required(self.gender, field).map(|_| ()),
            Field::Height => self.height().map(|_| ()),
            Field::Weight => self.weight().map(|_| ()),
            Field::Goal => required(self.goal, field).map(|_| ()),
            Field::Experience => required(self.experience, field).map(|_| ()),
            Field::DaysPerWeek => self.days_per_week().map(|_| ()),
            Field::SessionMinutes => self.session_minutes().map(|_| ()),
        }
    }

    fn age(&self) -> Result<u32, FieldError> {
        let age = text(&self.age, Field::Age)?
            .parse::<u32>()
            .map_err(|_| FieldError::Invalid(Field::Age))?;
        in_range(age, &Profile::AGE, Field::Age)
    }

    fn height(&self) -> Result<f32, FieldError> {
        in_range(
            decimal(&self.height, Field::Height)?,
            &Profile::HEIGHT,
            Field::Height,
        )
    }

    fn weight(&self) -> Result<f32, FieldError> {
        in_range(
            decimal(&self.weight, Field::Weight)?,
            &Profile::WEIGHT,
            Field::Weight,
        )
    }

    fn days_per_week(&self) -> Result<u32, FieldError> {
        in_range(
            required(self.days_per_week, Field::DaysPerWeek)?,
            &Profile::DAYS_PER_WEEK,
            Field::DaysPerWeek,
        )
    }

    fn session_minutes(&self) -> Result<u32, FieldError> {
        in_range(
            required(self.session_minutes, Field::SessionMinutes)?,
            &Profile::SESSION_MINUTES,
            Field::SessionMinutes,
        )
    }
}

fn required<T>(value: Option<T>, field: Field) -> Result<T, FieldError> {
    value.ok_or(FieldError::Required(field))
}

fn text(value: &str, field: Field) -> Result<&str, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::Required(field))
    } else {
        Ok(value)
    }
}

fn decimal(value: &str, field: Field) -> Result<f32, FieldError> {
    text(value, field)?
        .replace(',', ".")
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FieldError::Invalid(field))
}

fn in_range<T: PartialOrd>(
    value: T,
    range: &RangeInclusive<T>,
    field: Field,
) -> Result<T, FieldError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange(field))
    }
}

/// Linear onboarding wizard.
///
/// Moving forward validates only the fields of the current step. Moving back never validates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OnboardingWizard {
    step: Step,
    pub form: OnboardingForm,
    errors: Vec<FieldError>,
}

impl OnboardingWizard {
    #[must_use]
    pub fn new(form: OnboardingForm) -> Self {
        Self {
            step: Step::Welcome,
            form,
            errors: vec![],
        }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.iter().find(|e| e.field() == field).copied()
    }

    /// Advances to the next step if the current step is valid. `Complete` is terminal.
    pub fn next(&mut self) -> Result<Step, StepError> {
        if self.step == Step::Complete {
            return Err(StepError::Finished);
        }
        let errors = self.form.validate(self.step);
        if !errors.is_empty() {
            debug!("onboarding step {} is invalid", self.step);
            self.errors.clone_from(&errors);
            return Err(StepError::Invalid(errors));
        }
        self.errors.clear();
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        self.errors.clear();
        self.step = self.step.previous();
        self.step
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum OnboardingPhase {
    #[default]
    Idle,
    SavingProfile,
    GeneratingPlan,
    Success,
    Error(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("onboarding completion is already running")]
    Busy,
    #[error("onboarding completion has not been started")]
    NotStarted,
    #[error("{0}")]
    Failed(String),
}

/// Final step of the onboarding: save the profile, then generate the plan.
///
/// Clones share the same state, so the phase can be observed while the sequence is running.
#[derive(Debug, Default, Clone)]
pub struct OnboardingCompletion {
    phase: Rc<RefCell<OnboardingPhase>>,
    profile: Rc<RefCell<Option<Profile>>>,
}

impl OnboardingCompletion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> OnboardingPhase {
        self.phase.borrow().clone()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            *self.phase.borrow(),
            OnboardingPhase::SavingProfile | OnboardingPhase::GeneratingPlan
        )
    }

    /// Runs the completion sequence.
    ///
    /// The plan generation phase lasts at least until `min_delay` has resolved.
    pub async fn run<S, D>(
        &self,
        service: &S,
        profile: Profile,
        min_delay: D,
    ) -> Result<(), OnboardingError>
    where
        S: ProfileService + OnboardingService,
        D: Future<Output = ()>,
    {
        if self.is_busy() {
            return Err(OnboardingError::Busy);
        }
        *self.profile.borrow_mut() = Some(profile.clone());

        self.set_phase(OnboardingPhase::SavingProfile);
        if let Err(err) = service.update_profile(profile).await {
            return self.fail(&err.to_string());
        }

        self.set_phase(OnboardingPhase::GeneratingPlan);
        match at_least(service.complete_onboarding(), min_delay).await {
            Ok(()) => {}
            Err(err) if is_already_completed(&err) => {
                debug!("onboarding was already completed: {err}");
            }
            Err(err) => return self.fail(&err.to_string()),
        }

        self.set_phase(OnboardingPhase::Success);
        Ok(())
    }

    /// Re-runs the sequence with the profile of the last run.
    pub async fn retry<S, D>(&self, service: &S, min_delay: D) -> Result<(), OnboardingError>
    where
        S: ProfileService + OnboardingService,
        D: Future<Output = ()>,
    {
        let Some(profile) = self.profile.borrow().clone() else {
            return Err(OnboardingError::NotStarted);
        };
        self.run(service, profile, min_delay).await
    }

    fn set_phase(&self, phase: OnboardingPhase) {
        *self.phase.borrow_mut() = phase;
    }

    fn fail(&self, message: &str) -> Result<(), OnboardingError> {
        error!("failed to complete onboarding: {message}");
        self.set_phase(OnboardingPhase::Error(message.to_string()));
        Err(OnboardingError::Failed(message.to_string()))
    }
}

/// Resolves to the output of `future` once both `future` and `delay` have completed.
pub async fn at_least<F, D>(future: F, delay: D) -> F::Output
where
    F: Future,
    D: Future<Output = ()>,
{
    let (output, ()) = join(future, delay).await;
    output
}

fn is_already_completed(err: &CreateError) -> bool {
    matches!(
        err,
        CreateError::Conflict(message) if message.to_lowercase().contains("already completed")
    )
}

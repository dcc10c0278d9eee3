//! Cached REST
//!
//! The `REST` server acts as the authoritative data source, while the `QueryCache` keeps the
//! results of reads for all views. Mutations go to the server directly and drop the affected
//! cache entries on success, so that the next read fetches the current state.

use std::rc::Rc;

use forma_domain::{
    self as domain, AuthRepository, ExerciseRepository, OnboardingRepository, PlanRepository,
    ProfileRepository, TemplateRepository, WorkoutSessionRepository,
};
use log::debug;

use super::cache::{QueryCache, Resource};
use super::rest::{GlooNetSendRequest, REST, SendRequest};

macro_rules! cached {
    ($self: ident, $resource: expr, $read: ident $(, $arg:expr)*) => {{
        let resource = $resource;
        if let Some(value) = $self.cache.get(resource) {
            debug!("read {resource:?} from cache");
            return Ok(value);
        }
        let generation = $self.cache.generation(resource);
        let value = $self.rest.$read($($arg),*).await?;
        $self.cache.insert_if_current(resource, generation, value.clone());
        Ok(value)
    }};
}

macro_rules! invalidating {
    ($self: ident, [$($resource: expr),*], $method: ident $(, $arg:expr)*) => {{
        let result = $self.rest.$method($($arg),*).await?;
        $($self.cache.invalidate($resource);)*
        Ok(result)
    }};
}

#[derive(Clone)]
pub struct CachedREST<S: SendRequest> {
    pub rest: REST<S>,
    pub cache: Rc<QueryCache>,
}

impl CachedREST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(base_url: &str, cache: Rc<QueryCache>) -> Self {
        Self {
            rest: REST::new(base_url),
            cache,
        }
    }
}

impl<S: SendRequest> domain::AuthRepository for CachedREST<S> {
    async fn read_current_user(&self) -> Result<domain::User, domain::ReadError> {
        cached!(self, Resource::CurrentUser, read_current_user)
    }

    async fn login(
        &self,
        credentials: domain::Credentials,
    ) -> Result<domain::User, domain::ReadError> {
        let user = self.rest.login(credentials).await?;
        self.cache.clear();
        self.cache.insert(Resource::CurrentUser, user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<(), domain::DeleteError> {
        let result = self.rest.logout().await;
        self.cache.clear();
        result
    }

    async fn register(
        &self,
        registration: domain::Registration,
    ) -> Result<domain::User, domain::CreateError> {
        let user = self.rest.register(registration).await?;
        self.cache.clear();
        self.cache.insert(Resource::CurrentUser, user.clone());
        Ok(user)
    }

    async fn read_invitation(&self, code: &str) -> Result<domain::Invitation, domain::ReadError> {
        self.rest.read_invitation(code).await
    }
}

impl<S: SendRequest> domain::ProfileRepository for CachedREST<S> {
    async fn read_profile(&self) -> Result<domain::Profile, domain::ReadError> {
        cached!(self, Resource::Profile, read_profile)
    }

    async fn update_profile(
        &self,
        profile: domain::Profile,
    ) -> Result<domain::Profile, domain::UpdateError> {
        let profile = self.rest.update_profile(profile).await?;
        self.cache.insert(Resource::Profile, profile.clone());
        Ok(profile)
    }
}

impl<S: SendRequest> domain::OnboardingRepository for CachedREST<S> {
    async fn complete_onboarding(&self) -> Result<(), domain::CreateError> {
        invalidating!(
            self,
            [Resource::CurrentUser, Resource::Plans, Resource::Programs],
            complete_onboarding
        )
    }
}

impl<S: SendRequest> domain::ExerciseRepository for CachedREST<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        cached!(self, Resource::Exercises, read_exercises)
    }
}

impl<S: SendRequest> domain::PlanRepository for CachedREST<S> {
    async fn read_plans(&self) -> Result<Vec<domain::Plan>, domain::ReadError> {
        cached!(self, Resource::Plans, read_plans)
    }

    async fn read_programs(&self) -> Result<Vec<domain::Program>, domain::ReadError> {
        cached!(self, Resource::Programs, read_programs)
    }

    async fn update_program(
        &self,
        program: domain::Program,
    ) -> Result<domain::Program, domain::UpdateError> {
        invalidating!(
            self,
            [Resource::Programs, Resource::Plans],
            update_program,
            program
        )
    }
}

impl<S: SendRequest> domain::TemplateRepository for CachedREST<S> {
    async fn read_template(
        &self,
        id: domain::TemplateID,
    ) -> Result<domain::WorkoutTemplate, domain::ReadError> {
        cached!(self, Resource::Template(id), read_template, id)
    }

    async fn add_template_exercise(
        &self,
        id: domain::TemplateID,
        exercise_id: domain::ExerciseID,
        order: usize,
        targets: domain::Targets,
    ) -> Result<domain::TemplateExercise, domain::CreateError> {
        invalidating!(
            self,
            [Resource::Template(id)],
            add_template_exercise,
            id,
            exercise_id,
            order,
            targets
        )
    }

    async fn update_template_exercise(
        &self,
        id: domain::TemplateID,
        template_exercise_id: domain::TemplateExerciseID,
        targets: domain::Targets,
    ) -> Result<domain::TemplateExercise, domain::UpdateError> {
        invalidating!(
            self,
            [Resource::Template(id)],
            update_template_exercise,
            id,
            template_exercise_id,
            targets
        )
    }

    async fn remove_template_exercise(
        &self,
        id: domain::TemplateID,
        template_exercise_id: domain::TemplateExerciseID,
    ) -> Result<domain::TemplateExerciseID, domain::DeleteError> {
        invalidating!(
            self,
            [Resource::Template(id)],
            remove_template_exercise,
            id,
            template_exercise_id
        )
    }

    async fn reorder_template_exercises(
        &self,
        id: domain::TemplateID,
        order: Vec<domain::TemplateExerciseID>,
    ) -> Result<(), domain::UpdateError> {
        invalidating!(
            self,
            [Resource::Template(id)],
            reorder_template_exercises,
            id,
            order
        )
    }
}

impl<S: SendRequest> domain::WorkoutSessionRepository for CachedREST<S> {
    async fn read_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::ReadError> {
        cached!(self, Resource::Session(id), read_session, id)
    }

    async fn start_session(
        &self,
        template_id: domain::TemplateID,
    ) -> Result<domain::WorkoutSession, domain::CreateError> {
        let session = self.rest.start_session(template_id).await?;
        self.cache
            .insert(Resource::Session(session.id), session.clone());
        Ok(session)
    }

    async fn complete_session(
        &self,
        id: domain::SessionID,
        notes: Option<String>,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        invalidating!(self, [Resource::Session(id)], complete_session, id, notes)
    }

    async fn cancel_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        invalidating!(self, [Resource::Session(id)], cancel_session, id)
    }

    async fn confirm_draft_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        invalidating!(self, [Resource::Session(id)], confirm_draft_session, id)
    }

    async fn regenerate_draft_session(
        &self,
        id: domain::SessionID,
    ) -> Result<domain::WorkoutSession, domain::UpdateError> {
        invalidating!(self, [Resource::Session(id)], regenerate_draft_session, id)
    }

    async fn add_session_exercise(
        &self,
        id: domain::SessionID,
        exercise_id: domain::ExerciseID,
        order: usize,
        targets: domain::Targets,
    ) -> Result<domain::SessionExercise, domain::CreateError> {
        invalidating!(
            self,
            [Resource::Session(id)],
            add_session_exercise,
            id,
            exercise_id,
            order,
            targets
        )
    }

    async fn update_session_exercise(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
        targets: domain::Targets,
    ) -> Result<domain::SessionExercise, domain::UpdateError> {
        invalidating!(
            self,
            [Resource::Session(id)],
            update_session_exercise,
            id,
            session_exercise_id,
            targets
        )
    }

    async fn remove_session_exercise(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
    ) -> Result<domain::SessionExerciseID, domain::DeleteError> {
        invalidating!(
            self,
            [Resource::Session(id)],
            remove_session_exercise,
            id,
            session_exercise_id
        )
    }

    async fn reorder_session_exercises(
        &self,
        id: domain::SessionID,
        order: Vec<domain::SessionExerciseID>,
    ) -> Result<(), domain::UpdateError> {
        invalidating!(
            self,
            [Resource::Session(id)],
            reorder_session_exercises,
            id,
            order
        )
    }

    async fn log_set(
        &self,
        id: domain::SessionID,
        session_exercise_id: domain::SessionExerciseID,
        reps: u32,
        weight: f32,
    ) -> Result<domain::LoggedSet, domain::CreateError> {
        invalidating!(
            self,
            [Resource::Session(id)],
            log_set,
            id,
            session_exercise_id,
            reps,
            weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use std::cell::RefCell;

        use pretty_assertions::assert_eq;
        use serde_json::json;
        use wasm_bindgen_test::wasm_bindgen_test;

        use crate::rest;
        use crate::tests::data::{EXERCISES, SESSION, TEMPLATE, USER};

        use super::*;

        #[wasm_bindgen_test]
        async fn test_read_exercises_is_cached() {
            let cached_rest = cached_rest_with_response(Some(
                gloo_net::http::Response::builder().status(200).json(
                    &EXERCISES
                        .iter()
                        .map(rest::Exercise::from)
                        .collect::<Vec<_>>(),
                ),
            ));

            assert_eq!(cached_rest.read_exercises().await.unwrap(), EXERCISES.clone());
            assert!(cached_rest.cache.contains(Resource::Exercises));

            // The mock has no further response, so a second request would fail.
            assert_eq!(cached_rest.read_exercises().await.unwrap(), EXERCISES.clone());
        }

        #[wasm_bindgen_test]
        async fn test_read_failure_is_not_cached() {
            let cached_rest = cached_rest_with_response(None);

            assert!(matches!(
                cached_rest.read_template(TEMPLATE.id).await,
                Err(domain::ReadError::Storage(
                    domain::StorageError::NoConnection
                ))
            ));
            assert!(!cached_rest.cache.contains(Resource::Template(TEMPLATE.id)));
        }

        #[wasm_bindgen_test]
        async fn test_reorder_invalidates_template() {
            let cached_rest = cached_rest_with_response(Some(
                gloo_net::http::Response::builder()
                    .status(204)
                    .body::<Option<&str>>(None),
            ));
            cached_rest
                .cache
                .insert(Resource::Template(TEMPLATE.id), TEMPLATE.clone());
            cached_rest.cache.insert(Resource::Session(SESSION.id), SESSION.clone());

            cached_rest
                .reorder_template_exercises(TEMPLATE.id, vec![12.into(), 11.into()])
                .await
                .unwrap();

            assert!(!cached_rest.cache.contains(Resource::Template(TEMPLATE.id)));
            assert!(cached_rest.cache.contains(Resource::Session(SESSION.id)));
        }

        #[wasm_bindgen_test]
        async fn test_failed_mutation_keeps_cache() {
            let cached_rest = cached_rest_with_response(Some(
                gloo_net::http::Response::builder()
                    .status(409)
                    .json(&json!({ "message": "Session already completed" })),
            ));
            cached_rest.cache.insert(Resource::Session(SESSION.id), SESSION.clone());

            assert!(matches!(
                cached_rest.complete_session(SESSION.id, None).await,
                Err(domain::UpdateError::Conflict(_))
            ));
            assert!(cached_rest.cache.contains(Resource::Session(SESSION.id)));
        }

        #[wasm_bindgen_test]
        async fn test_logout_clears_cache_even_offline() {
            let cached_rest = cached_rest_with_response(None);
            cached_rest.cache.insert(Resource::CurrentUser, USER.clone());
            cached_rest.cache.insert(Resource::Exercises, EXERCISES.clone());

            assert!(cached_rest.logout().await.is_err());

            assert!(!cached_rest.cache.contains(Resource::CurrentUser));
            assert!(!cached_rest.cache.contains(Resource::Exercises));
        }

        #[wasm_bindgen_test]
        async fn test_complete_onboarding_invalidates_user() {
            let cached_rest = cached_rest_with_response(Some(
                gloo_net::http::Response::builder()
                    .status(204)
                    .body::<Option<&str>>(None),
            ));
            cached_rest.cache.insert(Resource::CurrentUser, USER.clone());

            cached_rest.complete_onboarding().await.unwrap();

            assert!(!cached_rest.cache.contains(Resource::CurrentUser));
        }

        fn cached_rest_with_response(
            response: Option<Result<gloo_net::http::Response, gloo_net::Error>>,
        ) -> CachedREST<MockSendRequest> {
            let sender = MockSendRequest {
                request: RefCell::new(None),
                response: RefCell::new(response),
            };
            CachedREST {
                rest: REST {
                    sender,
                    base_url: "api".to_string(),
                },
                cache: Rc::new(QueryCache::new()),
            }
        }

        struct MockSendRequest {
            request: RefCell<Option<gloo_net::http::Request>>,
            response: RefCell<Option<Result<gloo_net::http::Response, gloo_net::Error>>>,
        }

        impl SendRequest for MockSendRequest {
            async fn send_request(
                &self,
                request: gloo_net::http::Request,
            ) -> Result<gloo_net::http::Response, gloo_net::Error> {
                *self.request.borrow_mut() = Some(request);
                (*self.response.borrow_mut())
                    .take()
                    .unwrap_or(Err(gloo_net::Error::GlooError("no response".to_string())))
            }
        }
    }
}

use std::cell::{Cell, RefCell};

use forma_domain::{AuthService, SessionID, TemplateID, User};
use log::{debug, warn};

use crate::{Branding, Settings};

/// Exercise list a modal operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOwner {
    Template(TemplateID),
    Session(SessionID),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    AddExercise(ListOwner),
    SwapExercise(ListOwner),
    EditTargets(ListOwner),
    CompleteSession(SessionID),
    CancelSession(SessionID),
}

/// Application state shared by all views.
///
/// Created when the application starts. Signing out discards all user-specific state.
#[derive(Debug, Default)]
pub struct AppContext {
    user: RefCell<Option<User>>,
    settings: Cell<Settings>,
    branding: RefCell<Branding>,
    modals: RefCell<Vec<Modal>>,
}

impl AppContext {
    #[must_use]
    pub fn new(settings: Settings, branding: Branding) -> Self {
        Self {
            user: RefCell::new(None),
            settings: Cell::new(settings),
            branding: RefCell::new(branding),
            modals: RefCell::new(vec![]),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    #[must_use]
    pub fn needs_onboarding(&self) -> bool {
        self.user
            .borrow()
            .as_ref()
            .is_some_and(|user| !user.onboarding_completed)
    }

    pub fn sign_in(&self, user: User) {
        debug!("signed in as user {}", user.id);
        *self.user.borrow_mut() = Some(user);
        self.modals.borrow_mut().clear();
    }

    /// Ends the session on the server and discards the local user state.
    ///
    /// The local state is discarded even if the server could not be reached.
    pub async fn sign_out<S: AuthService>(&self, service: &S) {
        if let Err(err) = service.logout().await {
            warn!("failed to end session on server: {err}");
        }
        *self.user.borrow_mut() = None;
        self.modals.borrow_mut().clear();
    }

    pub fn complete_onboarding(&self) {
        if let Some(user) = self.user.borrow_mut().as_mut() {
            user.onboarding_completed = true;
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn set_settings(&self, settings: Settings) {
        self.settings.set(settings);
    }

    #[must_use]
    pub fn branding(&self) -> Branding {
        self.branding.borrow().clone()
    }

    pub fn set_branding(&self, branding: Branding) {
        *self.branding.borrow_mut() = branding;
    }

    #[must_use]
    pub fn modal(&self) -> Option<Modal> {
        self.modals.borrow().last().copied()
    }

    pub fn open_modal(&self, modal: Modal) {
        self.modals.borrow_mut().push(modal);
    }

    pub fn close_modal(&self) -> Option<Modal> {
        self.modals.borrow_mut().pop()
    }
}

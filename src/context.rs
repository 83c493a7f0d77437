// src/context.rs

use crate::auth::{AuthError, AuthProvider, SessionContext};
use crate::routes::Route;
use crate::store::DocumentStore;
use crate::views::{DetailView, ListView};
use log::{error, info};
use std::sync::Arc;

/// Root application state: the store, the auth provider and the session built on it.
pub struct AppContext {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    session: SessionContext,
}

impl AppContext {
    pub fn start(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        let session = SessionContext::init(auth.as_ref());
        info!(
            "AppContext: started ({})",
            if session.is_signed_in() { "signed in" } else { "signed out" }
        );
        AppContext {
            store,
            auth,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn sign_in(&mut self) -> Result<(), AuthError> {
        match self.auth.sign_in_with_popup() {
            Ok(_) => {
                self.session.pump();
                Ok(())
            }
            Err(e) => {
                error!("Sign-in failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.auth.sign_out()?;
        self.session.pump();
        Ok(())
    }

    /// Applies pending identity changes.
    pub fn pump(&mut self) -> bool {
        self.session.pump()
    }

    /// Mounts the view for `route`, applies the snapshots already available and
    /// returns its markup. The view is unmounted on return.
    pub fn render_route(&mut self, route: &Route) -> String {
        self.pump();
        let store = self.store.as_ref();
        match route {
            Route::List => {
                let mut view = ListView::mount(store);
                view.pump();
                view.render(&self.session)
            }
            Route::Problem(id) => {
                let mut view = DetailView::mount(store, id.clone());
                view.pump(store);
                view.render()
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
        info!("AppContext: shut down");
    }
}

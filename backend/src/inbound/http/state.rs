//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureStudentCommand, FixtureStudentQuery, StudentCommand, StudentQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub students: Arc<dyn StudentQuery>,
    pub student_commands: Arc<dyn StudentCommand>,
}

impl HttpState {
    /// Construct state from the student query and command ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use invigilation::domain::ports::{FixtureStudentCommand, FixtureStudentQuery};
    /// use invigilation::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureStudentQuery), Arc::new(FixtureStudentCommand));
    /// let _students = state.students.clone();
    /// ```
    pub fn new(
        students: Arc<dyn StudentQuery>,
        student_commands: Arc<dyn StudentCommand>,
    ) -> Self {
        Self {
            students,
            student_commands,
        }
    }

    /// Share one service object for both ports.
    pub fn from_service<T>(service: Arc<T>) -> Self
    where
        T: StudentQuery + StudentCommand + 'static,
    {
        Self {
            students: service.clone(),
            student_commands: service,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureStudentQuery), Arc::new(FixtureStudentCommand))
    }
}

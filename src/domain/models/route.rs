/// Screens of the interactive mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Create,
    Query(String),
    Exit,
}

impl Route {
    /// Screens that only make sense with a session.
    pub fn requires_auth(&self) -> bool {
        return matches!(self, Route::Dashboard | Route::Create | Route::Query(_));
    }
}

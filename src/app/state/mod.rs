use std::sync::mpsc::{channel, Receiver, TryRecvError};

use tokio::runtime::Runtime;

use crate::app::auth::AuthFailure;
use crate::app::context::CampusClient;
use crate::app::routes::Route;
use crate::app::session::{Session, SessionStatus};
use crate::shared::{
    ApiError, Credentials, DashboardStats, Event, Exam, ExamResult, Identity, ListQuery, Page, ProfileUpdate,
    RegistrationData, Role, StudyMaterial,
};

type Pending<T> = Option<Receiver<T>>;

/// What a pending task produced since the last frame
#[derive(Debug, PartialEq)]
enum Polled<T> {
    Ready(T),
    /// The task ended without sending, e.g. it panicked
    Lost,
}

/// Data shown by the list views
#[derive(Debug, Clone)]
pub enum PageData {
    Events(Page<Event>),
    Exams(Page<Exam>),
    Results(Page<ExamResult>),
    Materials(Page<StudyMaterial>),
}

/// Login and registration inputs
#[derive(Debug, Default)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl AuthForm {
    fn clear_secrets(&mut self) {
        self.password.clear();
        self.confirm_password.clear();
    }
}

/// Profile edit inputs
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileForm {
    fn fill(&mut self, identity: &Identity) {
        self.first_name = identity.first_name.clone();
        self.last_name = identity.last_name.clone();
        self.email = identity.email.clone();
        self.phone = identity.phone.clone().unwrap_or_default();
        self.address = identity.address.clone().unwrap_or_default();
    }

    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            address: Some(self.address.clone()),
        }
    }
}

/// Central application state shared across egui views.
///
/// Async work runs on the owned runtime; results come back over channels
/// that are polled once per frame.
pub struct AppState {
    runtime: Runtime,
    pub client: CampusClient,
    pub auth_form: AuthForm,
    pub profile_form: ProfileForm,
    pub is_register_mode: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub busy: bool,
    pub search_input: String,
    pub stats: Option<DashboardStats>,
    pub page_data: Option<PageData>,
    auth_result: Pending<Result<Identity, AuthFailure>>,
    profile_result: Pending<Result<Identity, AuthFailure>>,
    stats_result: Pending<Result<DashboardStats, ApiError>>,
    page_result: Pending<Result<PageData, ApiError>>,
    bootstrap_result: Pending<SessionStatus>,
    loaded_route: Option<Route>,
}

impl AppState {
    pub fn new(runtime: Runtime, client: CampusClient) -> Self {
        let mut state = Self {
            runtime,
            client,
            auth_form: AuthForm::default(),
            profile_form: ProfileForm::default(),
            is_register_mode: false,
            error: None,
            notice: None,
            busy: false,
            search_input: String::new(),
            stats: None,
            page_data: None,
            auth_result: None,
            profile_result: None,
            stats_result: None,
            page_result: None,
            bootstrap_result: None,
            loaded_route: None,
        };
        state.start_bootstrap();
        state
    }

    pub fn session(&self) -> Session {
        self.client.session().snapshot()
    }

    pub fn current_route(&self) -> Route {
        self.client.navigator().current()
    }

    fn start_bootstrap(&mut self) {
        let client = self.client.clone();
        self.bootstrap_result = Some(self.spawn(async move { client.bootstrap().await }));
    }

    fn spawn<T, F>(&self, future: F) -> Receiver<T>
    where
        T: Send + 'static,
        F: std::future::Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let _ = tx.send(future.await);
        });
        rx
    }

    fn task_lost(&mut self, what: &str) {
        tracing::error!("{} task ended without a result", what);
        self.busy = false;
        self.error = Some(format!("{} did not finish, please try again", what));
    }

    /// Drain finished async work; call once per frame
    pub fn poll(&mut self) {
        match take_ready(&mut self.bootstrap_result) {
            Some(Polled::Ready(status)) => tracing::debug!(?status, "Bootstrap finished"),
            Some(Polled::Lost) => tracing::error!("Bootstrap task ended without a result"),
            None => {}
        }

        match take_ready(&mut self.auth_result) {
            Some(Polled::Ready(result)) => {
                self.busy = false;
                match result {
                    Ok(identity) => {
                        self.error = None;
                        self.auth_form.clear_secrets();
                        self.is_register_mode = false;
                        self.notice = Some(format!("Welcome, {}", identity.display_name()));
                        self.client.open_route(Route::LANDING);
                    }
                    Err(failure) => self.error = Some(failure.message),
                }
            }
            Some(Polled::Lost) => self.task_lost("Sign-in"),
            None => {}
        }

        match take_ready(&mut self.profile_result) {
            Some(Polled::Ready(result)) => {
                self.busy = false;
                match result {
                    Ok(identity) => {
                        self.profile_form.fill(&identity);
                        self.notice = Some("Profile updated".to_string());
                    }
                    Err(failure) => self.error = Some(failure.message),
                }
            }
            Some(Polled::Lost) => self.task_lost("Profile update"),
            None => {}
        }

        match take_ready(&mut self.stats_result) {
            Some(Polled::Ready(Ok(stats))) => self.stats = Some(stats),
            Some(Polled::Ready(Err(err))) => self.error = Some(err.user_message()),
            Some(Polled::Lost) => self.task_lost("Loading the dashboard"),
            None => {}
        }

        match take_ready(&mut self.page_result) {
            Some(Polled::Ready(Ok(data))) => self.page_data = Some(data),
            Some(Polled::Ready(Err(err))) => self.error = Some(err.user_message()),
            Some(Polled::Lost) => self.task_lost("Loading the list"),
            None => {}
        }

        let route = self.current_route();
        if self.session().is_authenticated() && self.loaded_route.as_ref() != Some(&route) {
            self.loaded_route = Some(route.clone());
            self.load_route(&route);
        }
        if !self.session().is_authenticated() {
            self.loaded_route = None;
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.error = None;
        self.notice = None;
        self.client.open_route(route);
    }

    pub fn handle_login(&mut self) {
        if self.auth_form.username.is_empty() || self.auth_form.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return;
        }

        self.busy = true;
        self.error = None;

        let credentials = Credentials::new(self.auth_form.username.clone(), self.auth_form.password.clone());
        let client = self.client.clone();
        self.auth_result = Some(self.spawn(async move { client.auth().login(&credentials).await }));
    }

    pub fn handle_register(&mut self) {
        let form = &self.auth_form;
        if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
            self.error = Some("Username, email and password are required".to_string());
            return;
        }
        if form.password != form.confirm_password {
            self.error = Some("Passwords do not match".to_string());
            return;
        }

        let data = RegistrationData {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            password_confirm: form.confirm_password.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            role: form.role,
            ..Default::default()
        };

        self.busy = true;
        self.error = None;

        let client = self.client.clone();
        self.auth_result = Some(self.spawn(async move { client.auth().register(&data).await }));
    }

    pub fn handle_profile_update(&mut self) {
        self.busy = true;
        self.error = None;

        let update = self.profile_form.to_update();
        let client = self.client.clone();
        self.profile_result = Some(self.spawn(async move { client.auth().update_profile(&update).await }));
    }

    pub fn logout(&mut self) {
        let client = self.client.clone();
        self.runtime.block_on(async move { client.auth().logout().await });
        self.auth_form = AuthForm::default();
        self.stats = None;
        self.page_data = None;
        self.error = None;
        self.notice = None;
        self.client.open_route(Route::Home);
    }

    pub fn toggle_auth_mode(&mut self) {
        self.is_register_mode = !self.is_register_mode;
        self.error = None;
        self.auth_form.clear_secrets();
        let route = if self.is_register_mode { Route::Register } else { Route::Login };
        self.client.open_route(route);
    }

    /// Reload the data behind the current route
    pub fn refresh(&mut self) {
        let route = self.current_route();
        self.load_route(&route);
    }

    fn load_route(&mut self, route: &Route) {
        let client = self.client.clone();
        let query = if self.search_input.trim().is_empty() {
            ListQuery::default()
        } else {
            ListQuery::search(self.search_input.trim())
        };

        match route {
            Route::Dashboard | Route::Admin(_) => {
                self.stats_result = Some(self.spawn(async move { client.campus().dashboard_stats().await }));
            }
            Route::Events => {
                self.page_result = Some(self.spawn(async move {
                    client.campus().list::<Event>(&query).await.map(PageData::Events)
                }));
            }
            Route::Exams => {
                self.page_result = Some(self.spawn(async move {
                    client.campus().list::<Exam>(&query).await.map(PageData::Exams)
                }));
            }
            Route::Results => {
                self.page_result = Some(self.spawn(async move {
                    client.campus().list::<ExamResult>(&query).await.map(PageData::Results)
                }));
            }
            Route::Materials => {
                self.page_result = Some(self.spawn(async move {
                    client.campus().list::<StudyMaterial>(&query).await.map(PageData::Materials)
                }));
            }
            Route::Profile => {
                if let Some(identity) = self.client.session().identity() {
                    self.profile_form.fill(&identity);
                }
            }
            _ => {}
        }
    }
}

/// Take a finished result, emptying the slot. `None` while the task still runs.
fn take_ready<T>(pending: &mut Pending<T>) -> Option<Polled<T>> {
    let polled = match pending.as_ref()?.try_recv() {
        Ok(value) => Polled::Ready(value),
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => Polled::Lost,
    };
    *pending = None;
    Some(polled)
}

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, Argon2PasswordEncoder, InMemoryAccountStore, SessionTokenService, TracingOtpMailer,
};
use crate::routes::with_service_routes;
use axum::Extension;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use interview_scheduler::config::AppConfig;
use interview_scheduler::error::AppError;
use interview_scheduler::scheduling::{
    BookingService, MemoryApplicantDirectory, MemoryInterviewStore, SchedulingState,
};
use interview_scheduler::signup::SignupService;
use interview_scheduler::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
    };

    let interviews = Arc::new(MemoryInterviewStore::default());
    let directory = Arc::new(MemoryApplicantDirectory::default());
    let bookings = Arc::new(BookingService::new(interviews, directory));

    let accounts = Arc::new(InMemoryAccountStore::default());
    let tokens = Arc::new(SessionTokenService::default());
    let signup = Arc::new(SignupService::new(
        accounts,
        Arc::new(Argon2PasswordEncoder),
        tokens.clone(),
        Arc::new(TracingOtpMailer),
        &config.signup,
    ));

    let app = with_service_routes(SchedulingState { bookings, tokens }, signup)
        .layer(Extension(app_state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "interview scheduler ready");

    axum::serve(listener, app).await?;
    Ok(())
}

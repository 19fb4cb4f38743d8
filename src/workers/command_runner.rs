use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use crate::config::config_manager::ConfigManager;
use crate::enums::commands::Commands;
use crate::enums::diff_annotation::DiffAnnotation;
use crate::enums::status_filter::StatusFilter;
use crate::errors::{ReviewError, ReviewResult, ResultExt};
use crate::logger::animated_logger::AnimatedLogger;
use crate::logger::diff_logger::DiffLogger;
use crate::services::auth_client::AuthClient;
use crate::services::diff_engine::DiffEngine;
use crate::services::requests_client::RequestsClient;
use crate::structs::api::request_query::RequestQuery;
use crate::structs::change_set::ChangeSet;
use crate::structs::config::config::Config;
use crate::structs::field_path::FieldPath;
use crate::traits::record_store::RecordStore;
use crate::ui::review_server::ReviewServer;
use crate::ui::session_manager::SessionManager;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands) -> ReviewResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command(),
            Commands::Validate => self.validate_command(),
            Commands::Login { email } => self.login_command(&email).await,
            Commands::Logout => self.logout_command(),
            Commands::Whoami => self.whoami_command().await,
            Commands::List { status, page } => self.list_command(status, page).await,
            Commands::Show { id, json } => self.show_command(&id, json).await,
            Commands::Diff { original, changes, json } => self.diff_command(&original, &changes, json),
            Commands::Edit { id, assignments } => self.edit_command(&id, &assignments).await,
            Commands::Approve { id } => self.decide_command(&id, true).await,
            Commands::Reject { id } => self.decide_command(&id, false).await,
            Commands::Purge { yes } => self.purge_command(yes).await,
            Commands::Review { id, no_browser } => self.review_command(&id, no_browser).await,
        };

        if let Some(start) = self.start_time {
            log::debug!("⏱️  Command completed in {:.2}s", start.elapsed().as_secs_f64());
        }

        result
    }

    fn init_command(&self) -> ReviewResult<()> {
        log::info!("🚀 Initializing parfum-review configuration...");

        let path = ConfigManager::create_sample_config()?;
        log::info!("📝 Edit {} to point at your catalog API.", path.display());
        log::info!("🔧 Run 'parfum-review validate' to check your configuration.");
        Ok(())
    }

    fn validate_command(&self) -> ReviewResult<()> {
        log::info!("🔍 Validating parfum-review configuration...");

        let config = ConfigManager::load()?;
        if let Err(issues) = ConfigManager::validate_config(&config) {
            println!("❌ Configuration has {} issue(s):", issues.len());
            for issue in &issues {
                println!("   - {}", issue);
            }
            return Err(ReviewError::MultipleErrors {
                errors: issues.iter()
                    .map(|issue| ReviewError::config_error(issue, None, None))
                    .collect(),
                context: "configuration validation".to_string(),
            });
        }

        println!("✅ Configuration is valid");
        println!("   🌐 API: {}", config.api.base_url);
        println!("   🙈 Excluded keys: {}", config.review.excluded_keys.join(", "));
        Ok(())
    }

    async fn login_command(&self, email: &str) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let auth = AuthClient::new(&config.api, ConfigManager::token_path())?;

        eprint!("🔒 Password for {}: ", email);
        let mut password = String::new();
        io::stdin().lock().read_line(&mut password)?;
        let password = password.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            return Err(ReviewError::user_input_error("", "a non-empty password", "Pipe or type the password"));
        }

        AnimatedLogger::track("Signing in", "Signed in", auth.sign_in(email, password)).await
    }

    fn logout_command(&self) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        AuthClient::new(&config.api, ConfigManager::token_path())?.sign_out()
    }

    async fn whoami_command(&self) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let auth = AuthClient::new(&config.api, ConfigManager::token_path())?;

        match auth.current_user().await? {
            Some(user) => {
                let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("👤 {} <{}>", name, user.email.as_deref().unwrap_or("unknown"));
            }
            None => println!("👤 Not signed in. Run 'parfum-review login --email <email>'."),
        }
        Ok(())
    }

    async fn list_command(&self, status: StatusFilter, page: u32) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let store = Self::requests_client(&config)?;
        let query = RequestQuery {
            page: page.max(1),
            limit: config.api.page_size,
            status,
        };

        let page_result = AnimatedLogger::track(
            "Loading change requests",
            "Change requests loaded",
            store.list_requests(&query),
        ).await?;

        DiffLogger::new(config.output.color).print_request_list(&page_result, query.page);
        Ok(())
    }

    async fn show_command(&self, id: &str, json: bool) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let store = Self::requests_client(&config)?;
        let engine = Self::diff_engine(&config);

        let request = AnimatedLogger::track("Loading change request", "Change request loaded", store.get_request(id)).await?;
        let annotations = engine.annotate(request.perfume.as_ref(), &request.changes);

        if json || Self::wants_json(&config) {
            return Self::print_json(&annotations);
        }

        let logger = DiffLogger::new(config.output.color);
        logger.print_request_header(&request);
        logger.print_annotations(&annotations);
        Ok(())
    }

    fn diff_command(&self, original: &Path, changes: &Path, json: bool) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let engine = Self::diff_engine(&config);

        let original = Self::read_change_set(original)?;
        let changes = Self::read_change_set(changes)?;
        let annotations = engine.annotate(Some(&original), &changes);

        if json || Self::wants_json(&config) {
            return Self::print_json(&annotations);
        }

        DiffLogger::new(config.output.color).print_annotations(&annotations);
        Ok(())
    }

    async fn edit_command(&self, id: &str, assignments: &[String]) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let store = Self::requests_client(&config)?;
        let edits = assignments.iter()
            .map(|assignment| Self::parse_assignment(assignment))
            .collect::<ReviewResult<Vec<_>>>()?;

        let request = AnimatedLogger::track("Loading change request", "Change request loaded", store.get_request(id)).await?;
        let sessions = SessionManager::new(Self::diff_engine(&config));
        let session_id = sessions.create_session(request);

        sessions.start_edit(&session_id)?;
        for (path, value) in &edits {
            sessions.edit_field(&session_id, path, value)
                .with_context(&format!("setting {}", path))?;
            log::info!("✏️  {} = {}", path, value);
        }

        AnimatedLogger::track("Saving changes", "Changes saved", sessions.save(&session_id, &store)).await?;

        let view = sessions.view(&session_id)?;
        DiffLogger::new(config.output.color).print_annotations(&view.annotations);
        sessions.remove_session(&session_id);
        Ok(())
    }

    async fn decide_command(&self, id: &str, approve: bool) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let store = Self::requests_client(&config)?;

        let request = store.get_request(id).await?;
        if !request.is_pending() {
            return Err(ReviewError::validation_error(
                "status",
                &request.status.to_string(),
                "request has already been processed",
                None,
            ));
        }

        if approve {
            AnimatedLogger::track("Approving request", "Request approved", store.approve(id)).await
        } else {
            AnimatedLogger::track("Rejecting request", "Request rejected", store.reject(id)).await
        }
    }

    async fn purge_command(&self, yes: bool) -> ReviewResult<()> {
        if !yes {
            return Err(ReviewError::user_input_error(
                "purge",
                "explicit confirmation",
                "Re-run with --yes to delete every change request",
            ));
        }

        let config = ConfigManager::load()?;
        let store = Self::requests_client(&config)?;
        AnimatedLogger::track("Deleting all change requests", "All change requests deleted", store.delete_all()).await
    }

    async fn review_command(&self, id: &str, no_browser: bool) -> ReviewResult<()> {
        let config = ConfigManager::load()?;
        let store: Arc<dyn RecordStore> = Arc::new(Self::requests_client(&config)?);

        let request = AnimatedLogger::track("Loading change request", "Change request loaded", store.get_request(id)).await?;
        let sessions = Arc::new(SessionManager::new(Self::diff_engine(&config)));
        let session_id = sessions.create_session(request);

        let mut server = ReviewServer::new(Arc::clone(&sessions), Arc::clone(&store));
        server.start().await?;

        let url = server.session_url(&session_id)
            .ok_or_else(|| ReviewError::system_error("review", "server did not report a port"))?;
        println!("🌐 Review page: {}", url);

        if config.review.open_browser && !no_browser {
            if let Err(e) = webbrowser::open(&url) {
                log::warn!("⚠️ Could not open browser: {}", e);
            }
        }

        log::info!("⏳ Waiting for the review to be closed in the browser...");
        let outcome = server.wait_for_close(&session_id, config.review.session_timeout_minutes).await;
        server.shutdown().await?;

        match outcome? {
            Some(session) => println!("📋 Review closed: request {} is {}", session.request.id, session.request.status.label()),
            None => println!("⏰ Review timed out; no further changes were made."),
        }
        sessions.remove_session(&session_id);
        Ok(())
    }

    fn requests_client(config: &Config) -> ReviewResult<RequestsClient> {
        let auth = AuthClient::new(&config.api, ConfigManager::token_path())?;
        let token = auth.token()?;
        if token.is_none() {
            log::warn!("⚠️ No token found; requests are sent unauthenticated");
        }
        RequestsClient::new(&config.api, token)
    }

    fn diff_engine(config: &Config) -> DiffEngine {
        DiffEngine::new(config.review.excluded_keys.iter().cloned())
    }

    fn wants_json(config: &Config) -> bool {
        config.output.format == "json"
    }

    fn print_json(annotations: &[DiffAnnotation]) -> ReviewResult<()> {
        println!("{}", serde_json::to_string_pretty(annotations)?);
        Ok(())
    }

    fn read_change_set(path: &Path) -> ReviewResult<ChangeSet> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReviewError::file_error(&path.display().to_string(), "read", &e.to_string()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(&path.display().to_string())?;
        Ok(ChangeSet::from_json(&value))
    }

    /// Splits `notes.top_notes=citrus, sea` into a path and raw input.
    pub fn parse_assignment(assignment: &str) -> ReviewResult<(FieldPath, String)> {
        let (path, value) = assignment.split_once('=').ok_or_else(|| ReviewError::user_input_error(
            assignment,
            "PATH=VALUE",
            "Use dots between nested keys, e.g. notes.top_notes=\"citrus, sea\"",
        ))?;
        Ok((path.trim().parse()?, value.to_string()))
    }
}

//! Command handlers for the `curio` binary.
//!
//! [`App`] owns the configuration and the learning history database and
//! builds the model router, encyclopedia client and memory store on
//! demand, so commands that only read history work without an API key.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{Command, MemoryCommand};
use crate::config::{AppConfig, EmbedderKind};
use crate::core::discovery::{
    find_relevant_personas, AgenticSearch, ExpertTools, Persona, SimpleSearch,
};
use crate::core::intent::IntentParser;
use crate::core::llm::{build_router, google_providers, LLMRouter, MessageRole};
use crate::core::logging::{heading, muted, persona_label, spinner, warning};
use crate::core::memory::{Embedder, HashingEmbedder, MemoryStore, ProviderEmbedder};
use crate::core::persona::StudentLevel;
use crate::core::tutor::{StartParams, TutorService, TutorSession, OPENING_REQUEST};
use crate::core::wiki::{PersonaEnricher, WikipediaClient};
use crate::database::{AnalyticsOps, Database, SessionOps, UserOps};
use crate::error::{CurioError, Result};

const QUIT_COMMAND: &str = "/quit";

pub struct App {
    config: AppConfig,
    db: Database,
}

impl App {
    pub async fn open(config: AppConfig) -> Result<Self> {
        let db = Database::new(&config.database_path()).await?;
        Ok(Self { config, db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login {
                name,
                email,
                region,
            } => self.login(&name, &email, &region).await,
            Command::Experts {
                topic,
                region,
                agentic,
            } => self.experts(&topic, &region, agentic).await,
            Command::Chat {
                user,
                topic,
                persona,
                region,
                level,
                custom,
                resume,
            } => match resume {
                Some(session_id) => self.resume_chat(&user, session_id).await,
                None => {
                    let params = ChatArgs {
                        user,
                        topic: topic.unwrap_or_default(),
                        persona: persona.unwrap_or_default(),
                        region,
                        level,
                        custom,
                    };
                    self.start_chat(params).await
                }
            },
            Command::Fact { persona } => self.fact(&persona).await,
            Command::Image { persona } => self.image(&persona).await,
            Command::Intent { query } => self.intent(&query).await,
            Command::Stats { user } => self.stats(&user).await,
            Command::Popular { limit } => self.popular(limit).await,
            Command::History { session, delete } => self.history(session, delete).await,
            Command::Memory(command) => self.memory_command(command).await,
            Command::Models => self.models().await,
        }
    }

    // ========================================================================
    // Component construction
    // ========================================================================

    async fn router(&self) -> Result<Arc<LLMRouter>> {
        Ok(Arc::new(build_router(&self.config.llm).await?))
    }

    fn wiki(&self) -> Result<Arc<WikipediaClient>> {
        Ok(Arc::new(WikipediaClient::new(&self.config.wiki)?))
    }

    /// Memory store with the configured embedder. Without a usable model
    /// the hashing embedder stands in.
    fn memory(&self, router: Option<&LLMRouter>) -> Arc<MemoryStore> {
        let settings = &self.config.memory;
        let hashing = || -> Arc<dyn Embedder> {
            Arc::new(HashingEmbedder::new(settings.hashing_dimension))
        };

        let embedder = match (settings.embedder, router.and_then(LLMRouter::primary)) {
            (EmbedderKind::Provider, Some(provider)) => {
                Arc::new(ProviderEmbedder::new(provider)) as Arc<dyn Embedder>
            }
            (EmbedderKind::Provider, None) => {
                tracing::debug!("no model provider for embeddings, using hashing embedder");
                hashing()
            }
            (EmbedderKind::Hashing, _) => hashing(),
        };

        if !settings.enabled {
            return Arc::new(MemoryStore::unavailable(embedder));
        }
        Arc::new(MemoryStore::open(&self.config.memory_dir(), embedder))
    }

    async fn tutor(&self) -> Result<TutorService> {
        let router = self.router().await?;
        let enricher = Arc::new(PersonaEnricher::new(self.wiki()?, router.clone()));
        let memory = self.memory(Some(&router));
        Ok(TutorService::new(
            self.db.clone(),
            router,
            enricher,
            memory,
            self.config.tutor.clone(),
        ))
    }

    // ========================================================================
    // Learners and discovery
    // ========================================================================

    async fn login(&self, name: &str, email: &str, region: &str) -> Result<()> {
        let user = self
            .db
            .get_or_create_user(None, name, region, Some(email))
            .await?;
        println!("{} {}", heading("Welcome,"), user.display_name());
        println!("{}", user.user_id);
        Ok(())
    }

    async fn experts(&self, topic: &str, region: &str, agentic: bool) -> Result<()> {
        let router = self.router().await?;
        let bar = spinner(format!("Finding experts on {topic}..."));

        let personas = if agentic {
            let tools = ExpertTools::new(self.wiki()?, router.clone());
            let result = AgenticSearch::new(router.clone(), tools).run(topic, region).await;
            bar.finish_and_clear();

            for step in &result.agent_steps {
                println!(
                    "{}",
                    muted(&format!("  step {}: {} {}", step.step, step.tool, step.input))
                );
            }
            if result.is_success() {
                result.personas
            } else {
                let reason = result.error.unwrap_or_default();
                println!("{}", warning(&format!("Agent search failed ({reason}), using quick search")));
                find_relevant_personas(&SimpleSearch::new(router), topic, region).await
            }
        } else {
            let personas = find_relevant_personas(&SimpleSearch::new(router), topic, region).await;
            bar.finish_and_clear();
            personas
        };

        println!("{}", heading(&format!("Experts for {topic} ({region})")));
        print_personas(&personas);
        Ok(())
    }

    async fn fact(&self, persona: &str) -> Result<()> {
        let enricher = PersonaEnricher::new(self.wiki()?, self.router().await?);
        match enricher.fun_fact(persona).await {
            Some(fact) => println!("💡 {fact}"),
            None => println!("{}", muted(&format!("No fun fact found for {persona}"))),
        }
        Ok(())
    }

    async fn image(&self, persona: &str) -> Result<()> {
        println!("{}", self.wiki()?.image_url(persona).await);
        Ok(())
    }

    async fn intent(&self, query: &str) -> Result<()> {
        let intent = IntentParser::new(self.router().await?).parse(query).await;
        println!("{:<14} {}", heading("goal"), intent.goal);
        println!("{:<14} {}", heading("domain"), intent.domain);
        println!("{:<14} {}", heading("stage"), intent.user_stage);
        println!("{:<14} {}", heading("decision"), intent.decision_type);
        Ok(())
    }

    // ========================================================================
    // Tutoring
    // ========================================================================

    async fn start_chat(&self, args: ChatArgs) -> Result<()> {
        let user = self
            .db
            .get_user(&args.user)
            .await?
            .ok_or_else(|| unknown_learner(&args.user))?;
        let service = self.tutor().await?;

        let bar = spinner(format!("Connecting you with {}...", args.persona));
        let params = StartParams {
            user_id: user.user_id.clone(),
            username: user.display_name().to_string(),
            topic: args.topic,
            persona: args.persona,
            region: args.region,
            level: args.level,
            is_custom: args.custom,
        };
        let session = service.start(&params).await;
        bar.finish_and_clear();

        self.chat_loop(session?).await
    }

    async fn resume_chat(&self, user_id: &str, session_id: i64) -> Result<()> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| unknown_learner(user_id))?;
        let service = self.tutor().await?;

        let bar = spinner(format!("Reopening session {session_id}..."));
        let session = service.resume(session_id, &user.user_id, user.display_name()).await;
        bar.finish_and_clear();

        self.chat_loop(session?).await
    }

    async fn chat_loop(&self, mut session: TutorSession) -> Result<()> {
        println!(
            "{} {}",
            heading("Learning"),
            persona_label(&format!("{} with {}", session.topic(), session.persona()))
        );
        println!("{}", muted(&format!("Type {QUIT_COMMAND} to end the session.")));

        for message in session.history() {
            if message.role == MessageRole::User && message.content == OPENING_REQUEST {
                continue;
            }
            print_turn(session.persona(), message.role, &message.content);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{} ", heading("you>"));
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == QUIT_COMMAND {
                break;
            }

            let bar = spinner(format!("{} is thinking...", session.persona()));
            let reply = session.send(line).await;
            bar.finish_and_clear();
            print_turn(session.persona(), MessageRole::Assistant, &reply?);
        }

        session.end().await?;
        println!("{}", muted(&format!("Session {} saved.", session.session_id())));
        Ok(())
    }

    // ========================================================================
    // History
    // ========================================================================

    async fn stats(&self, user_id: &str) -> Result<()> {
        let stats = self.db.get_user_stats(user_id).await?;

        println!("{}", heading("Your learning"));
        println!("  sessions: {}", stats.total_sessions);
        println!("  messages: {}", stats.total_messages);

        if !stats.favorite_topics.is_empty() {
            println!("{}", heading("Favorite topics"));
            for t in &stats.favorite_topics {
                println!("  {} ({})", t.topic, t.count);
            }
        }
        if !stats.favorite_personas.is_empty() {
            println!("{}", heading("Favorite guides"));
            for p in &stats.favorite_personas {
                println!("  {} ({})", persona_label(&p.persona), p.count);
            }
        }
        if !stats.recent_sessions.is_empty() {
            println!("{}", heading("Recent sessions"));
            for s in &stats.recent_sessions {
                println!(
                    "  #{} {} with {} {}",
                    s.session_id,
                    s.topic,
                    s.persona,
                    muted(&format!("({}, {} messages)", s.started_at, s.message_count))
                );
            }
        }
        Ok(())
    }

    async fn popular(&self, limit: i64) -> Result<()> {
        let topics = self.db.get_popular_topics(limit).await?;
        let personas = self.db.get_popular_personas(limit).await?;

        println!("{}", heading("Popular topics"));
        for (i, t) in topics.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, t.topic, t.count);
        }
        println!("{}", heading("Popular guides"));
        for (i, p) in personas.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, persona_label(&p.persona), p.count);
        }
        Ok(())
    }

    async fn history(&self, session_id: i64, delete: bool) -> Result<()> {
        if delete {
            self.db.delete_session(session_id).await?;
            println!("{}", muted(&format!("Session {session_id} deleted.")));
            return Ok(());
        }

        let details = self
            .db
            .get_session_details(session_id)
            .await?
            .ok_or_else(|| CurioError::NotFound(format!("Learning session {session_id} not found")))?;
        let session = &details.session;

        println!(
            "{} {}",
            heading(&format!("#{} {}", session.session_id, session.topic)),
            persona_label(&session.persona)
        );
        println!(
            "{}",
            muted(&format!(
                "started {}{}, {} messages",
                session.started_at,
                session
                    .ended_at
                    .map(|t| format!(", ended {t}"))
                    .unwrap_or_default(),
                session.message_count
            ))
        );
        for message in &details.messages {
            let role = if message.role == "assistant" {
                MessageRole::Assistant
            } else {
                MessageRole::User
            };
            print_turn(&session.persona, role, &message.content);
        }
        Ok(())
    }

    // ========================================================================
    // Memory and models
    // ========================================================================

    async fn memory_command(&self, command: MemoryCommand) -> Result<()> {
        // Searches must embed with the same model that stored the memories
        let router = match self.router().await {
            Ok(router) => Some(router),
            Err(e) => {
                tracing::debug!(error = %e, "memory command without model router");
                None
            }
        };
        let memory = self.memory(router.as_deref());
        if !memory.is_available() {
            println!("{}", warning("Learning memory is disabled or unavailable."));
            return Ok(());
        }

        match command {
            MemoryCommand::Search { user, topic, limit } => {
                let hits = memory.search_memory_by_topic(&user, &topic, limit).await;
                if hits.is_empty() {
                    println!("{}", muted("No memories found."));
                }
                for hit in hits {
                    println!(
                        "{} {}",
                        heading(&hit.topic),
                        muted(&format!("with {} (session {})", hit.persona, hit.session_id))
                    );
                    println!("  {}", hit.content.replace('\n', "\n  "));
                }
            }
            MemoryCommand::Profile { user } => {
                let profile = memory.user_learning_profile(&user).await;
                println!(
                    "{} {}",
                    heading("Learning insights"),
                    muted(&format!("({} total)", profile.total_insights))
                );
                for insight in &profile.learning_insights {
                    println!("  [{}] {}", insight.insight_type, insight.text);
                }
            }
            MemoryCommand::Note { user, kind, text } => {
                if memory.store_learning_insight(&user, &kind, &text, None).await {
                    println!("{}", muted("Insight saved."));
                } else {
                    println!("{}", warning("Insight could not be saved."));
                }
            }
            MemoryCommand::Clear { user } => {
                if memory.clear_user_memory(&user).await {
                    println!("{}", muted(&format!("All memories of {user} cleared.")));
                } else {
                    println!("{}", warning("Memory could not be cleared."));
                }
            }
        }
        Ok(())
    }

    async fn models(&self) -> Result<()> {
        let providers = google_providers(&self.config.llm)?;
        let provider = providers
            .first()
            .ok_or_else(|| CurioError::NotFound("No chat models configured".to_string()))?;

        let models = provider.list_models().await?;
        println!("{}", heading("Models supporting chat"));
        for model in models {
            let name = model.name.trim_start_matches("models/");
            match model.display_name {
                Some(display) => println!("  {name} {}", muted(&format!("({display})"))),
                None => println!("  {name}"),
            }
        }
        Ok(())
    }
}

struct ChatArgs {
    user: String,
    topic: String,
    persona: String,
    region: String,
    level: StudentLevel,
    custom: bool,
}

fn unknown_learner(user_id: &str) -> CurioError {
    CurioError::NotFound(format!(
        "Unknown learner {user_id}; run `curio login` to get your id"
    ))
}

fn print_personas(personas: &[Persona]) {
    if personas.is_empty() {
        println!("{}", muted("No experts found."));
    }
    for (i, persona) in personas.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            persona_label(&persona.name),
            muted(&format!("- {}", persona.description))
        );
    }
}

fn print_turn(persona: &str, role: MessageRole, content: &str) {
    match role {
        MessageRole::Assistant => {
            println!("\n{}", persona_label(&format!("{persona}:")));
            println!("{content}\n");
        }
        _ => println!("{} {}", heading("you>"), content),
    }
}

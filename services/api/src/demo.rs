use crate::infra::InMemoryApplicationStore;
use clap::Args;
use ev_assist::assistant::applications::{
    ApplicationService, ApplicationStore, JsonFileStore, NewApplication,
};
use ev_assist::assistant::chat::ChatEngine;
use ev_assist::assistant::intent::IntentClassifier;
use ev_assist::assistant::knowledge::KnowledgeBase;
use ev_assist::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

const EXAMPLE_MESSAGES: &[&str] = &[
    "hi",
    "where can I find a charging station near me?",
    "how much does it cost to charge an EV?",
    "what are the technical requirements for chargers?",
    "how to apply to set up an ev charging station?",
    "status of {app_id}",
    "update {app_id}: contractor selected and equipment ordered",
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Message to classify and answer; runs the example walkthrough if empty
    pub(crate) query: Vec<String>,
    /// Persist the demo store and FAQ under this directory instead of memory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    match args.data_dir {
        Some(dir) => {
            let store = Arc::new(JsonFileStore::open(dir.join("applications.json"))?);
            let knowledge = KnowledgeBase::load(&dir.join("faq.json"))?;
            run_session(store, knowledge, args.query)
        }
        None => {
            let store = Arc::new(InMemoryApplicationStore::default());
            run_session(store, KnowledgeBase::seed(), args.query)
        }
    }
}

fn run_session<S>(
    store: Arc<S>,
    knowledge: KnowledgeBase,
    query: Vec<String>,
) -> Result<(), AppError>
where
    S: ApplicationStore + 'static,
{
    let applications = Arc::new(ApplicationService::new(store));
    let engine = ChatEngine::new(IntentClassifier::new(), knowledge, applications.clone());

    let inputs = if query.is_empty() {
        // Seed one application so the status and progress examples have a
        // real id to act on.
        let record = applications.create(NewApplication {
            applicant: "Riverside County Fleet Services".to_string(),
            site_address: Some("480 Commerce Park Drive".to_string()),
            power_kw: Some(150),
            connectors: vec!["CCS".to_string(), "Type 2".to_string()],
            contact: None,
            notes: Some("public fast-charging hub".to_string()),
        })?;
        println!(
            "Seeded demo application {} ({})",
            record.app_id, record.status
        );

        EXAMPLE_MESSAGES
            .iter()
            .map(|message| message.replace("{app_id}", record.app_id.as_str()))
            .collect()
    } else {
        vec![query.join(" ")]
    };

    for text in inputs {
        let outcome = engine.respond(&text)?;
        println!();
        println!("USER: {text}");
        println!(
            "INTENT: {} (conf={}) app_id={} message={}",
            outcome.intent,
            outcome.confidence,
            outcome
                .slots
                .app_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("-"),
            outcome.slots.message.as_deref().unwrap_or("-"),
        );
        for line in outcome.reply.lines() {
            println!("BOT: {line}");
        }
    }

    Ok(())
}

use async_trait::async_trait;
use clap::Args;
use interview_booking::config::NotificationConfig;
use interview_booking::error::AppError;
use interview_booking::workflows::interviews::{
    generate_link, InterviewLifecycleService, InterviewRequest, InterviewServiceError,
};
use interview_booking::workflows::notifications::{
    InMemoryBroker, NotificationDispatcher, SmsError, SmsGateway,
};
use interview_booking::workflows::parties::{Party, PartyId, PartyRegistryService, PartyRole};
use interview_booking::workflows::store::InMemoryBookingStore;
use std::sync::Arc;

use crate::infra::notification_pipeline;

const DEMO_SENDER: &str = "+10000000000";

/// Prints each message instead of sending it.
struct ConsoleGateway;

#[async_trait]
impl SmsGateway for ConsoleGateway {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), SmsError> {
        println!("  [sms {from} -> {to}] {body}");
        Ok(())
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Slot label used for the first booking
    #[arg(long, default_value = "2026-11-02 10:00")]
    pub(crate) slot: String,
    /// Slot label the interview is moved to
    #[arg(long, default_value = "2026-11-03 15:30")]
    pub(crate) reschedule_to: String,
    /// Join link supplied with the booking
    #[arg(long, default_value = "https://meet.example/demo")]
    pub(crate) link: String,
}

#[derive(Args, Debug)]
pub(crate) struct LinkArgs {
    /// Number of links to print
    #[arg(long, default_value_t = 1)]
    pub(crate) count: usize,
}

pub(crate) fn run_links(args: LinkArgs) -> Result<(), AppError> {
    for _ in 0..args.count {
        let link = generate_link().map_err(InterviewServiceError::from)?;
        println!("{link}");
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        slot,
        reschedule_to,
        link,
    } = args;

    let store = Arc::new(InMemoryBookingStore::default());
    let broker = InMemoryBroker::new();
    let (publisher, subscription) = notification_pipeline(
        &broker,
        &NotificationConfig {
            topic: "notification_topic".to_string(),
            subscription: "notification_subscription".to_string(),
        },
    )?;
    let dispatcher =
        NotificationDispatcher::new(subscription, Arc::new(ConsoleGateway), DEMO_SENDER).spawn();

    let parties = PartyRegistryService::new(store.clone(), "91");
    let interviews = InterviewLifecycleService::new(store, Arc::new(publisher));

    println!("== Interview Booking Demo ==");
    println!("Registering participants");
    for (role, name, phone) in [
        (PartyRole::Interviewer, "Asha Rao", "+919000000001"),
        (PartyRole::Interviewer, "Dev Menon", "+919000000002"),
        (PartyRole::Hr, "Meera Iyer", "+919000000003"),
        (PartyRole::Candidate, "Ravi Kumar", "+919000000004"),
        (PartyRole::Candidate, "Sara Thomas", "+919000000005"),
    ] {
        let party = parties.register(
            role,
            Party {
                id: PartyId::default(),
                name: name.to_string(),
                phone_number: phone.to_string(),
            },
        )?;
        println!("  {role} #{} {} ({})", party.id, party.name, party.phone_number);
    }

    let booking = |interviewer: i64, candidate: i64, at: &str| InterviewRequest {
        interviewer_id: PartyId(interviewer),
        candidate_id: PartyId(candidate),
        hr_id: PartyId(1),
        scheduled_time: at.to_string(),
        interview_link: link.clone(),
        ..InterviewRequest::default()
    };

    println!();
    println!("Booking Ravi with Asha at {slot}");
    let interview = interviews.create(booking(1, 1, &slot))?;
    println!("  interview #{} created", interview.id);

    println!("Booking Sara with Dev at {slot} (same HR)");
    match interviews.create(booking(2, 2, &slot)) {
        Ok(other) => println!("  unexpectedly booked #{}", other.id),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("Moving interview #{} to {reschedule_to}", interview.id);
    let mut moved = booking(1, 1, &reschedule_to);
    moved.rescheduled = true;
    let interview = interviews.reschedule(interview.id, moved)?;
    println!(
        "  interview #{} now at {} (rescheduled: {})",
        interview.id, interview.scheduled_time, interview.rescheduled
    );

    broker.close();
    if let Err(err) = dispatcher.await {
        println!("dispatcher stopped abnormally: {err}");
    }

    if let Some(stats) = broker.stats("notification_subscription") {
        println!();
        println!(
            "Notifications delivered: {}, acknowledged: {}",
            stats.delivered, stats.acknowledged
        );
    }

    Ok(())
}

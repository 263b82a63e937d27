//! # agora-demo
//!
//! Mounts every Agora widget, plays a short scripted session against them
//! and prints each widget's view model as JSON, the way a renderer would
//! receive it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use agora_client::sinks::LoggingSink;
use agora_client::{AppState, ClientConfig};
use agora_shared::constants::APP_NAME;
use agora_shared::{AttendanceStatus, ForumSort, QuestionSort, ReactionKind, VoteDirection};
use agora_store::comments::CommentAction;
use agora_store::forum::ForumAction;
use agora_store::micro_post::MicroPostAction;
use agora_store::poll::PollAction;
use agora_store::profile::ProfileAction;
use agora_store::qa::QaAction;
use agora_store::rsvp::RsvpAction;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agora_client::init_tracing();
    info!("Starting {APP_NAME} demo v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let app = AppState::mount(config, Arc::new(LoggingSink))?;

    play_local_widgets(&app)?;
    play_timed_widgets(&app).await?;

    print_view("comments", &app.comments.view())?;
    print_view("forum", &app.forum.view())?;
    print_view("rsvp", &app.rsvp.view())?;
    print_view("poll", &app.poll.view())?;
    print_view("qa", &app.qa.view())?;
    print_view("chat", &app.chat.store().view())?;
    print_view("feed", &app.feed.store().view())?;
    print_view("posts", &app.posts.store().view())?;
    print_view("micro_post", &app.micro_post.store().view())?;
    print_view("profile", &app.profile.store().view())?;

    app.unmount();
    Ok(())
}

/// Widgets with no timers: every action applies synchronously.
fn play_local_widgets(app: &AppState) -> anyhow::Result<()> {
    app.comments.dispatch(CommentAction::ToggleLike {
        comment_id: "1".into(),
        reply_id: None,
    });
    app.comments.dispatch(CommentAction::AddReply {
        comment_id: "2".into(),
        content: "Same here!".into(),
    });

    app.forum.dispatch(ForumAction::React {
        post_id: "3".into(),
        kind: ReactionKind::Love,
    });
    app.forum.dispatch(ForumAction::SortBy(ForumSort::Popular));

    app.rsvp.dispatch(RsvpAction::Respond(Some(AttendanceStatus::Going)));

    app.poll.dispatch(PollAction::SetQuestion("Cats or dogs?".into()));
    for (option_id, text) in [("1", "Cats"), ("2", "Dogs")] {
        app.poll.dispatch(PollAction::EditOption {
            option_id: option_id.into(),
            text: text.into(),
        });
    }
    app.poll.dispatch(PollAction::Publish);
    app.poll.dispatch(PollAction::CastVote {
        option_id: "1".into(),
    });

    app.qa.dispatch(QaAction::Vote {
        question_id: "2".into(),
        answer_id: None,
        direction: VoteDirection::Up,
    });
    app.qa.dispatch(QaAction::SubmitAnswer {
        question_id: "2".into(),
        content: "Start with Context and move to Zustand when it hurts.".into(),
    });
    app.qa.dispatch(QaAction::SortBy(QuestionSort::Activity));
    app.qa.dispatch(QaAction::Open(Some("2".into())));

    app.micro_post
        .store()
        .dispatch(MicroPostAction::Edit("Hello from the demo".into()));
    let posted = app.micro_post.submit()?;
    info!(%posted, "Micro-post sent");

    app.profile
        .store()
        .dispatch(ProfileAction::AddInterest("Hiking".into()));
    app.profile.save()?;

    Ok(())
}

/// Widgets driven by timers: act, then let the clock run.
async fn play_timed_widgets(app: &AppState) -> anyhow::Result<()> {
    app.chat.keystroke();
    app.chat.send("Anyone up for lunch?")?;
    app.posts.like("1")?;
    app.posts.like("2")?;

    let pages = app.config.feed_max_pages;
    for _ in 0..pages {
        app.feed.on_sentinel_visible();
        tokio::time::sleep(app.config.feed_fetch_delay + Duration::from_millis(50)).await;
    }

    // Long enough for the scripted reply and marker expiry.
    let settle = app.config.remote_reply_delay.max(app.config.marker_lifetime);
    tokio::time::sleep(settle + Duration::from_millis(100)).await;
    Ok(())
}

fn print_view<V: Serialize>(widget: &str, view: &V) -> anyhow::Result<()> {
    println!("== {widget} ==");
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

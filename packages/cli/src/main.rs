//! `thistle`, a command-line client for diaspora* pods.
//!
//! Signs in to a pod with the credentials from the command line or
//! environment, runs one operation, and prints the result as text (or raw
//! JSON with `--json`).
//!
//! # Quick start
//!
//! ```sh
//! export THISTLE_POD=https://pod.example.com
//! export THISTLE_USERNAME=alice
//! export THISTLE_PASSWORD=correct-horse
//!
//! thistle stream
//! thistle post "hello fediverse #rust"
//! thistle tag rust --json
//! thistle message bob@other-pod.example.com "lunch?" "usual place at noon"
//! ```
//!
//! Wire-level logging is available via `RUST_LOG=thistledown=debug`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use thistledown::{PostTarget, Session};
use thistledown_api::{Conversation, Handle, Notification, Person, Post};

/// thistle: diaspora* pod client
///
/// Read feeds, publish posts, and manage aspects from the command line.
#[derive(Parser)]
#[command(name = "thistle", version, about, long_about = None)]
struct Cli {
    /// Pod base URL, e.g. https://pod.example.com
    #[arg(long, env = "THISTLE_POD")]
    pod: String,

    /// Account username on the pod.
    #[arg(long, env = "THISTLE_USERNAME")]
    username: String,

    /// Account password.
    #[arg(long, env = "THISTLE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print your main stream.
    Stream,

    /// Print posts carrying a tag.
    Tag {
        /// Tag name, without the leading '#'.
        name: String,
    },

    /// Print posts you are mentioned in.
    Mentions,

    /// Publish a status message.
    ///
    /// Posts publicly unless --aspect or --all-aspects narrows the
    /// audience.
    Post {
        /// The post text. Hashtags federate as tags.
        text: String,

        /// Limit visibility to this aspect id. Repeat for several:
        /// --aspect 2 --aspect 5
        #[arg(long = "aspect", value_name = "ID")]
        aspects: Vec<u64>,

        /// Limit visibility to all of your aspects.
        #[arg(long, conflicts_with = "aspects")]
        all_aspects: bool,

        /// Attach a pending photo id from `thistle upload`. Repeatable.
        #[arg(long = "photo", value_name = "ID")]
        photos: Vec<u64>,
    },

    /// Delete one of your own posts.
    Delete {
        /// The post id (not the guid).
        id: u64,
    },

    /// Upload a photo for later attachment to a post.
    ///
    /// Prints the pending photo id to pass to `thistle post --photo`.
    Upload {
        /// Path to the image file.
        file: PathBuf,
    },

    /// Print your notification feed.
    Notifications,

    /// Print your conversation mailbox.
    Mailbox,

    /// Start a conversation with a person, addressed by handle.
    Message {
        /// Recipient handle, e.g. bob@other-pod.example.com
        handle: String,
        /// Conversation subject line.
        subject: String,
        /// First message text.
        text: String,
    },

    /// Search people by name or handle.
    People {
        /// Search query.
        query: String,
    },

    /// Follow a tag.
    Follow {
        /// Tag name, without the leading '#'.
        name: String,
    },

    /// Print your aspects.
    Aspects,

    /// Print your own user record.
    Whoami,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thistle=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let session = Session::login(&cli.pod, &cli.username, &cli.password)
        .unwrap_or_else(|e| fatal(&format!("login to {} failed: {e}", cli.pod)));

    if let Err(e) = run(&session, cli.command, cli.json) {
        fatal(&e.to_string());
    }
}

fn run(session: &Session, command: Command, json: bool) -> Result<(), thistledown::Error> {
    match command {
        Command::Stream => {
            let posts = session.stream()?;
            print_posts(&posts, json);
        }

        Command::Tag { name } => {
            let posts = session.tagged(&name)?;
            print_posts(&posts, json);
        }

        Command::Mentions => {
            let posts = session.mentions()?;
            print_posts(&posts, json);
        }

        Command::Post {
            text,
            aspects,
            all_aspects,
            photos,
        } => {
            let target = if !aspects.is_empty() {
                PostTarget::Aspects(aspects)
            } else if all_aspects {
                PostTarget::AllAspects
            } else {
                PostTarget::Public
            };
            let post = session.create_post(&text, &target, &photos)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post).unwrap());
            } else {
                println!("posted #{} (guid {})", post.id, post.guid);
            }
        }

        Command::Delete { id } => {
            session.delete_post(id)?;
            println!("deleted #{id}");
        }

        Command::Upload { file } => {
            let bytes = std::fs::read(&file)
                .unwrap_or_else(|e| fatal(&format!("failed to read {}: {e}", file.display())));
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| fatal(&format!("{} has no file name", file.display())));
            // The web client targets uploads at all of the user's aspects.
            let aspect_ids = session.user_info()?.aspect_ids();
            let photo = session.upload_photo(&filename, bytes, &aspect_ids)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&photo).unwrap());
            } else {
                println!("uploaded photo {} (pending)", photo.id);
                println!("attach it with: thistle post \"...\" --photo {}", photo.id);
            }
        }

        Command::Notifications => {
            let notifications = session.notifications()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notifications).unwrap());
            } else {
                print_notifications(&notifications);
            }
        }

        Command::Mailbox => {
            let conversations = session.mailbox()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conversations).unwrap());
            } else {
                print_mailbox(&conversations);
            }
        }

        Command::Message {
            handle,
            subject,
            text,
        } => {
            let handle = Handle::parse(&handle)
                .unwrap_or_else(|e| fatal(&format!("invalid handle: {e}")));
            let person = session
                .person_by_handle(&handle)?
                .unwrap_or_else(|| fatal(&format!("this pod knows nobody with handle {handle}")));
            let conversation = session.new_conversation(&[person.id], &subject, &text)?;
            println!("started conversation #{}: {}", conversation.id, conversation.subject);
        }

        Command::People { query } => {
            let people = session.search_people(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&people).unwrap());
            } else if people.is_empty() {
                println!("nobody found for {query:?}");
            } else {
                for person in &people {
                    println!("{}  (guid {})", person_label(person), person.guid);
                }
            }
        }

        Command::Follow { name } => {
            session.follow_tag(&name)?;
            println!("following #{name}");
        }

        Command::Aspects => {
            let aspects = session.aspects()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&aspects).unwrap());
            } else {
                for aspect in &aspects {
                    println!("{:>6}  {}", aspect.id, aspect.name);
                }
            }
        }

        Command::Whoami => {
            let info = session.user_info()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info).unwrap());
            } else {
                let name = info.name.as_deref().unwrap_or("(unnamed)");
                match &info.diaspora_id {
                    Some(id) => println!("{name} <{id}>"),
                    None => println!("{name}"),
                }
                println!("guid {}", info.guid);
                if let Some(n) = info.notifications_count {
                    println!("{n} unread notifications");
                }
                if let Some(n) = info.unread_messages_count {
                    println!("{n} unread messages");
                }
                if !info.aspects.is_empty() {
                    let names: Vec<&str> =
                        info.aspects.iter().map(|a| a.name.as_str()).collect();
                    println!("aspects: {}", names.join(", "));
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn print_posts(posts: &[Post], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(posts).unwrap());
        return;
    }
    if posts.is_empty() {
        println!("no posts");
        return;
    }
    for post in posts {
        print_post(post);
    }
}

fn print_post(post: &Post) {
    let author = post
        .author
        .as_ref()
        .map(person_label)
        .unwrap_or_else(|| "(unknown author)".to_string());
    println!("#{} by {}", post.id, author);
    if let Some(text) = &post.text {
        for line in text.lines() {
            println!("    {line}");
        }
    }
    let mut meta = Vec::new();
    if let Some(i) = &post.interactions {
        meta.push(format!("{} comments", i.comments_count));
        meta.push(format!("{} likes", i.likes_count));
    }
    if let Some(at) = &post.created_at {
        meta.push(at.clone());
    }
    if !meta.is_empty() {
        println!("    ({})", meta.join(", "));
    }
}

fn print_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("no notifications");
        return;
    }
    for n in notifications {
        let marker = if n.body.unread { "*" } else { " " };
        let when = n.body.created_at.as_deref().unwrap_or("");
        println!("{marker} [{}] #{} {when}", n.kind, n.body.id);
    }
}

fn print_mailbox(conversations: &[Conversation]) {
    if conversations.is_empty() {
        println!("mailbox is empty");
        return;
    }
    for c in conversations {
        let others: Vec<&str> = c
            .participants
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect();
        if others.is_empty() {
            println!("#{}  {}", c.id, c.subject);
        } else {
            println!("#{}  {}  (with {})", c.id, c.subject, others.join(", "));
        }
    }
}

fn person_label(person: &Person) -> String {
    match (&person.name, &person.diaspora_id) {
        (Some(name), Some(id)) => format!("{name} <{id}>"),
        (Some(name), None) => name.clone(),
        (None, Some(id)) => format!("<{id}>"),
        (None, None) => format!("person {}", person.id),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("thistle: {msg}");
    process::exit(2);
}

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use sqlx::PgPool;

use crate::application::blog_service::BlogService;
use crate::application::taxonomy_service::TaxonomyService;
use crate::application::user_service::UserService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::taxonomy_repository::PostgresTaxonomyRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::domain::post::{Post, PostDraft};
use crate::domain::user::{Author, RegisterRequest};
use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::server::run_http;

#[derive(Debug, Parser)]
#[command(name = "blog-web", version, about = "Blog web server and content management")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage tags.
    #[command(subcommand)]
    Tag(TagCommand),
    /// Manage authors.
    #[command(subcommand)]
    User(UserCommand),
    /// Write posts.
    #[command(subcommand)]
    Post(PostCommand),
}

#[derive(Debug, Subcommand)]
pub(crate) enum CategoryCommand {
    Add {
        #[arg(long)]
        name: String,
    },
    /// Deletes the category together with all of its posts.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum TagCommand {
    Add {
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum UserCommand {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum PostCommand {
    Add(PostArgs),
    /// Rewrites an existing post. Its creation time is kept.
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        post: PostArgs,
    },
}

#[derive(Debug, Args)]
pub(crate) struct PostArgs {
    #[arg(long)]
    pub(crate) title: String,
    /// Markdown body; `-` reads standard input.
    #[arg(long)]
    pub(crate) body_file: PathBuf,
    #[arg(long)]
    pub(crate) category: i64,
    /// Repeat for several tags.
    #[arg(long = "tag")]
    pub(crate) tags: Vec<i64>,
    /// Author username.
    #[arg(long)]
    pub(crate) author: String,
    /// RFC 3339 timestamp; defaults to now.
    #[arg(long)]
    pub(crate) created: Option<DateTime<Utc>>,
}

pub(crate) async fn execute(command: Command, settings: &Settings, pool: PgPool) -> Result<()> {
    match command {
        Command::Serve => {
            let state = AppState::new(
                Arc::new(PostgresPostRepository::new(pool.clone())),
                Arc::new(PostgresTaxonomyRepository::new(pool.clone())),
                Arc::new(PostgresCommentRepository::new(pool)),
            );
            run_http(settings, state).await?;
        }
        Command::Category(command) => {
            let service = TaxonomyService::new(PostgresTaxonomyRepository::new(pool));
            match command {
                CategoryCommand::Add { name } => {
                    let category = service.add_category(&name).await?;
                    println!("category {} created: {}", category.id, category.name);
                }
                CategoryCommand::Delete { id } => {
                    service.delete_category(id).await?;
                    println!("category {id} deleted");
                }
            }
        }
        Command::Tag(TagCommand::Add { name }) => {
            let tag = TaxonomyService::new(PostgresTaxonomyRepository::new(pool))
                .add_tag(&name)
                .await?;
            println!("tag {} created: {}", tag.id, tag.name);
        }
        Command::User(UserCommand::Add { username, email }) => {
            let user = UserService::new(PostgresUserRepository::new(pool))
                .register(RegisterRequest { username, email })
                .await?;
            println!("user {} created: {} <{}>", user.id, user.username, user.email);
        }
        Command::Post(command) => run_post_command(command, pool).await?,
    }
    Ok(())
}

async fn run_post_command(command: PostCommand, pool: PgPool) -> Result<()> {
    let users = UserService::new(PostgresUserRepository::new(pool.clone()));
    let blog = BlogService::new(
        PostgresPostRepository::new(pool.clone()),
        PostgresTaxonomyRepository::new(pool),
    );

    match command {
        PostCommand::Add(args) => {
            let author = users.find_by_username(&args.author).await?.as_author();
            let draft = draft_from(args, &author)?;
            let post = blog.create_post(draft).await?;
            print_post("created", &post);
        }
        PostCommand::Edit { id, post } => {
            let author = users.find_by_username(&post.author).await?.as_author();
            let draft = draft_from(post, &author)?;
            let post = blog.update_post(id, draft).await?;
            print_post("updated", &post);
        }
    }
    Ok(())
}

fn draft_from(args: PostArgs, author: &Author) -> Result<PostDraft> {
    let body = read_body(&args.body_file)?;
    Ok(PostDraft {
        title: args.title,
        body,
        category_id: args.category,
        tag_ids: args.tags,
        author_id: author.id,
        created_time: args.created,
    })
}

fn read_body(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("failed to read post body from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_post(action: &str, post: &Post) {
    println!("post {} {action}: {}", post.id, post.title);
    println!("  url:      {}", post.absolute_url());
    println!("  author:   {}", post.author.username);
    println!("  body:     {} chars", post.body().chars().count());
    println!("  excerpt:  {}", post.excerpt);
    println!("  modified: {}", post.modified_time.to_rfc3339());
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::{CategoryCommand, Cli, Command, PostCommand, read_body};

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["blog-web"]).expect("must parse");

        assert!(cli.command.is_none());
    }

    #[test]
    fn category_delete_parses_id() {
        let cli = Cli::try_parse_from(["blog-web", "category", "delete", "--id", "7"])
            .expect("must parse");

        assert!(matches!(
            cli.command,
            Some(Command::Category(CategoryCommand::Delete { id: 7 }))
        ));
    }

    #[test]
    fn post_edit_collects_repeated_tags_and_timestamp() {
        let cli = Cli::try_parse_from([
            "blog-web",
            "post",
            "edit",
            "--id",
            "3",
            "--title",
            "Hello",
            "--body-file",
            "-",
            "--category",
            "1",
            "--tag",
            "2",
            "--tag",
            "5",
            "--author",
            "writer",
            "--created",
            "2024-03-01T10:00:00Z",
        ])
        .expect("must parse");

        let Some(Command::Post(PostCommand::Edit { id, post })) = cli.command else {
            panic!("expected post edit");
        };
        assert_eq!(id, 3);
        assert_eq!(post.tags, vec![2, 5]);
        assert_eq!(post.body_file, Path::new("-"));
        assert_eq!(
            post.created.map(|created| created.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn post_add_requires_author() {
        let result = Cli::try_parse_from([
            "blog-web",
            "post",
            "add",
            "--title",
            "Hello",
            "--body-file",
            "body.md",
            "--category",
            "1",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn missing_body_file_reports_path() {
        let err = read_body(Path::new("/nonexistent/body.md")).expect_err("file must be missing");

        assert!(err.to_string().contains("/nonexistent/body.md"));
    }
}

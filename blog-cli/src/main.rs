use blog_client::{BlogClient, CommentThread, PostStatus, Project, TaskStatus};
use clap::{Parser, ValueEnum};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "Command line client for the blog API")]
struct Cli {
    #[arg(short, long, env = "BLOG_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Status {
    Draft,
    Published,
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Progress {
    Todo,
    InProgress,
    Done,
}

impl From<Progress> for TaskStatus {
    fn from(progress: Progress) -> Self {
        match progress {
            Progress::Todo => TaskStatus::Todo,
            Progress::InProgress => TaskStatus::InProgress,
            Progress::Done => TaskStatus::Done,
        }
    }
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    ListPosts {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    GetPost {
        id: Uuid,
    },
    MyPosts,
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, value_enum, default_value_t = Status::Draft)]
        status: Status,
    },
    UpdatePost {
        id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, value_enum)]
        status: Status,
    },
    DeletePost {
        id: Uuid,
    },
    Like {
        post_id: Uuid,
    },
    Comments {
        post_id: Uuid,
    },
    Comment {
        post_id: Uuid,
        #[arg(long)]
        content: String,
        /// Reply to this top-level comment.
        #[arg(long)]
        parent: Option<Uuid>,
    },
    EditComment {
        id: Uuid,
        #[arg(long)]
        content: String,
    },
    DeleteComment {
        id: Uuid,
    },
    Analytics,
    Projects,
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    UpdateProject {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    DeleteProject {
        id: Uuid,
    },
    CreateTask {
        project_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum, default_value_t = Progress::Todo)]
        status: Progress,
    },
    UpdateTask {
        id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        status: Progress,
    },
    DeleteTask {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut client = BlogClient::connect(&args.server)?;

    match args.command {
        Command::Register {
            email,
            password,
            name,
        } => {
            client.register(&email, &password, name.as_deref()).await?;
            println!("Successfully registered!");
        }
        Command::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("Successfully logged in!");
        }
        Command::ListPosts { limit, offset } => {
            let posts = client.list_posts(limit, offset).await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!(
                    "- [{}] {} ({} comments, {} likes)",
                    post.id, post.title, post.comment_count, post.like_count
                );
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            println!("{}", post);
        }
        Command::MyPosts => {
            for post in client.my_posts().await? {
                println!(
                    "- [{}] {} [{}] ({} comments, {} likes)",
                    post.id, post.title, post.status, post.comment_count, post.like_count
                );
            }
        }
        Command::CreatePost {
            title,
            content,
            status,
        } => {
            let id = client
                .create_post(&title, &content, Some(status.into()))
                .await?;
            println!("Post created! ID: {}", id);
        }
        Command::UpdatePost {
            id,
            title,
            content,
            status,
        } => {
            let post = client
                .update_post(id, &title, &content, status.into())
                .await?;
            println!("Post updated: {}", post)
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!")
        }
        Command::Like { post_id } => {
            if client.toggle_like(post_id).await? {
                println!("Liked");
            } else {
                println!("Like removed");
            }
        }
        Command::Comments { post_id } => {
            let threads = client.list_comments(post_id).await?;
            print_threads(&threads);
        }
        Command::Comment {
            post_id,
            content,
            parent,
        } => {
            let comment = client.create_comment(post_id, &content, parent).await?;
            println!("Comment created! ID: {}", comment.id);
        }
        Command::EditComment { id, content } => {
            let comment = client.update_comment(id, &content).await?;
            println!("Comment updated: {}", comment.content);
        }
        Command::DeleteComment { id } => {
            client.delete_comment(id).await?;
            println!("Comment deleted!");
        }
        Command::Analytics => {
            let stats = client.analytics().await?;
            println!(
                "Posts: {} ({} published, {} drafts)",
                stats.total_posts, stats.published_posts, stats.draft_posts
            );
            println!(
                "Comments: {}, likes: {}",
                stats.total_comments, stats.total_likes
            );
            for post in stats.posts_with_engagement {
                println!(
                    "- {}: {} comments, {} likes",
                    post.title, post.comments, post.likes
                );
            }
            for day in stats.activity_timeline {
                println!(
                    "{}: {} posts, {} comments, {} likes",
                    day.date, day.posts, day.comments, day.likes
                );
            }
        }
        Command::Projects => {
            let projects = client.list_projects().await?;
            print_projects(&projects);
        }
        Command::CreateProject { name, description } => {
            let project = client
                .create_project(&name, description.as_deref())
                .await?;
            println!("Project created! ID: {}", project.id);
        }
        Command::UpdateProject {
            id,
            name,
            description,
        } => {
            let project = client
                .update_project(id, &name, description.as_deref())
                .await?;
            println!("Project updated: {}", project.name);
        }
        Command::DeleteProject { id } => {
            client.delete_project(id).await?;
            println!("Project deleted!");
        }
        Command::CreateTask {
            project_id,
            title,
            description,
            status,
        } => {
            let task = client
                .create_task(project_id, &title, description.as_deref(), Some(status.into()))
                .await?;
            println!("Task created! ID: {}", task.id);
        }
        Command::UpdateTask {
            id,
            title,
            description,
            status,
        } => {
            let task = client
                .update_task(id, &title, description.as_deref(), status.into())
                .await?;
            println!("Task updated: {} ({})", task.title, task.status);
        }
        Command::DeleteTask { id } => {
            client.delete_task(id).await?;
            println!("Task deleted!");
        }
    }

    Ok(())
}

fn print_projects(projects: &[Project]) {
    for project in projects {
        println!("[{}] {}", project.id, project.name);
        if let Some(description) = &project.description {
            println!("    {description}");
        }
        for task in &project.tasks {
            println!("    - [{}] {} ({})", task.id, task.title, task.status);
        }
    }
}

fn print_threads(threads: &[CommentThread]) {
    for thread in threads {
        let c = &thread.comment;
        println!("[{}] {}: {}", c.id, c.user_id, c.content);
        for reply in &thread.replies {
            println!("    [{}] {}: {}", reply.id, reply.user_id, reply.content);
        }
    }
}

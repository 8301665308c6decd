use kibitz_client::{
    api::{Change, ChangeId, User, UserId, Workspace, WorkspaceId},
    Client,
};
use kibitz_mock_server::{MockServer, Seed};

pub fn user(id: &str) -> User {
    User {
        id: UserId::new(id),
        name: id.to_uppercase(),
        email: format!("{id}@example.com"),
    }
}

/// Two users, workspace `w1` and change `C1`, no comments yet
pub fn small_seed() -> Seed {
    Seed {
        users: vec![user("ada"), user("bob")],
        workspaces: vec![Workspace {
            id: WorkspaceId::new("w1"),
            up_to_date_with_trunk: false,
            draft_description: String::from("Make the parser faster"),
        }],
        changes: vec![Change {
            id: ChangeId::new("C1"),
            description: String::from("Initial import"),
        }],
        comments: Vec::new(),
    }
}

/// A client talking to a mock server seeded from `seed`, logged in as `who`
pub fn client_for(seed: Seed, who: &str) -> Client<MockServer> {
    let mut server = MockServer::from_seed(seed).expect("seeding mock server");
    server.login(UserId::new(who)).expect("logging in");
    Client::new(server)
}

pub fn run<F: std::future::Future>(f: F) -> F::Output {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt::try_init();
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed initializing tokio runtime")
        .block_on(f)
}

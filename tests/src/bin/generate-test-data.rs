use kibitz_client::api::{
    Change, ChangeId, CodeContext, CommentId, CreateCommentInput, UserId, Workspace, WorkspaceId,
};
use kibitz_mock_server::{Seed, SeedComment};
use rand::{seq::SliceRandom, Rng};

const NUM_USERS: usize = 3;
const NUM_WORKSPACES: usize = 5;
const NUM_CHANGES: usize = 10;

const NUM_TOP_COMMENTS: usize = 60;
const NUM_REPLIES: usize = 120;
const COMMENT_WORD_COUNT: usize = 12;
const DESCRIPTION_WORD_COUNT: usize = 6;

fn gen_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn gen_code_context(rng: &mut impl Rng) -> Option<CodeContext> {
    if !rng.gen_bool(0.5) {
        return None;
    }
    let line_start = rng.gen_range(1..500);
    Some(CodeContext {
        path: format!("src/{}.rs", lipsum::lipsum_words(1).to_lowercase()),
        line_start,
        line_end: line_start + rng.gen_range(0..5),
        line_is_new: rng.gen_bool(0.5),
    })
}

fn main() {
    let mut rng = rand::thread_rng();
    let mut seed = Seed::default();

    for i in 0..NUM_USERS {
        let name = lipsum::lipsum_words(1);
        seed.users.push(kibitz_client::api::User {
            id: UserId(gen_id()),
            email: format!("{}{i}@example.com", name.to_lowercase()),
            name,
        });
    }
    for _ in 0..NUM_WORKSPACES {
        seed.workspaces.push(Workspace {
            id: WorkspaceId(gen_id()),
            up_to_date_with_trunk: rng.gen_bool(0.5),
            draft_description: lipsum::lipsum_words(DESCRIPTION_WORD_COUNT),
        });
    }
    for _ in 0..NUM_CHANGES {
        seed.changes.push(Change {
            id: ChangeId(gen_id()),
            description: lipsum::lipsum_words(DESCRIPTION_WORD_COUNT),
        });
    }

    let gen_author = |rng: &mut rand::rngs::ThreadRng| -> UserId {
        seed.users
            .choose(rng)
            .expect("at least one user")
            .id
            .clone()
    };
    let mut comments = Vec::with_capacity(NUM_TOP_COMMENTS + NUM_REPLIES);
    for _ in 0..NUM_TOP_COMMENTS {
        let message = lipsum::lipsum_words(COMMENT_WORD_COUNT);
        let input = match rng.gen_bool(0.5) {
            true => CreateCommentInput::on_workspace(
                message,
                seed.workspaces.choose(&mut rng).expect("workspaces").id.clone(),
            ),
            false => CreateCommentInput::on_change(
                message,
                seed.changes.choose(&mut rng).expect("changes").id.clone(),
            ),
        };
        let input = match gen_code_context(&mut rng) {
            Some(ctx) => input.with_code_context(ctx),
            None => input,
        };
        comments.push(SeedComment {
            id: Some(CommentId(gen_id())),
            author: gen_author(&mut rng),
            input,
        });
    }
    for _ in 0..NUM_REPLIES {
        // only top comments can be replied to
        let parent = comments[rng.gen_range(0..NUM_TOP_COMMENTS)]
            .id
            .clone()
            .expect("top comments are generated with an id");
        comments.push(SeedComment {
            id: None,
            author: gen_author(&mut rng),
            input: CreateCommentInput::reply_to(lipsum::lipsum_words(COMMENT_WORD_COUNT), parent),
        });
    }
    seed.comments = comments;

    println!(
        "{}",
        serde_json::to_string_pretty(&seed).expect("serializing seed")
    );
}

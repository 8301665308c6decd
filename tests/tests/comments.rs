use kibitz_client::api::{
    ChangeId, CodeContext, CommentId, CommentsQuery, CreateCommentInput, Error,
    LandWorkspaceChangeInput, WorkspaceId,
};
use kibitz_mock_server::SeedComment;
use tests::{client_for, run, small_seed};

fn ids(comments: Option<Vec<kibitz_client::api::CommentFields>>) -> Vec<String> {
    comments
        .expect("list is cached")
        .into_iter()
        .map(|c| c.id.0)
        .collect()
}

fn seeded_comment(id: &str, input: CreateCommentInput) -> SeedComment {
    SeedComment {
        id: Some(CommentId::new(id)),
        author: kibitz_client::api::UserId::new("bob"),
        input,
    }
}

#[test]
fn new_workspace_comment_is_appended_once() {
    let mut seed = small_seed();
    seed.comments = vec![
        seeded_comment("a", CreateCommentInput::on_workspace("first", WorkspaceId::new("w1"))),
        seeded_comment("b", CreateCommentInput::on_workspace("second", WorkspaceId::new("w1"))),
    ];
    let mut client = client_for(seed, "ada");
    let query = CommentsQuery::Workspace(WorkspaceId::new("w1"));

    let created = run(async {
        client.fetch_comments(query.clone()).await.unwrap();
        client
            .create_comment(
                CreateCommentInput::on_workspace("third", WorkspaceId::new("w1")).with_code_context(
                    CodeContext {
                        path: String::from("src/lexer.rs"),
                        line_start: 10,
                        line_end: 12,
                        line_is_new: true,
                    },
                ),
            )
            .await
            .unwrap()
    });

    let new_id = created.id().0.clone();
    assert_eq!(
        ids(client.cached_comments(&query)),
        vec![String::from("a"), String::from("b"), new_id.clone()],
    );
    let cached = client.cached_comments(&query).unwrap();
    assert_eq!(cached[2].author.name, "ADA");
    assert_eq!(cached[2].code_context.as_ref().unwrap().path, "src/lexer.rs");

    // the server's view agrees with the reconciled cache
    run(async { client.fetch_comments(query.clone()).await.unwrap() });
    assert_eq!(
        ids(client.cached_comments(&query)),
        vec![String::from("a"), String::from("b"), new_id],
    );
}

#[test]
fn comment_on_uncached_change_only_normalizes() {
    let mut client = client_for(small_seed(), "ada");
    let query = CommentsQuery::Change(ChangeId::new("C1"));
    run(async {
        client
            .create_comment(CreateCommentInput::on_change("hi", ChangeId::new("C1")))
            .await
            .unwrap();
    });
    assert_eq!(client.cached_comments(&query), None);

    run(async { client.fetch_comments(query.clone()).await.unwrap() });
    assert_eq!(ids(client.cached_comments(&query)).len(), 1);
}

#[test]
fn replies_link_into_cached_parent() {
    let mut seed = small_seed();
    seed.comments = vec![
        seeded_comment("c1", CreateCommentInput::on_change("top", ChangeId::new("C1"))),
        seeded_comment("k1", CreateCommentInput::reply_to("first reply", CommentId::new("c1"))),
    ];
    let mut client = client_for(seed, "ada");
    let query = CommentsQuery::Change(ChangeId::new("C1"));

    let reply = run(async {
        client.fetch_comments(query.clone()).await.unwrap();
        client
            .create_comment(CreateCommentInput::reply_to("second reply", CommentId::new("c1")))
            .await
            .unwrap()
    });
    assert!(!reply.is_top());
    assert_eq!(
        ids(client.cached_replies(&CommentId::new("c1"))),
        vec![String::from("k1"), reply.id().0.clone()],
    );
    assert_eq!(ids(client.cached_comments(&query)), vec![String::from("c1")]);
}

#[test]
fn reply_to_parent_without_cached_replies_links_nothing() {
    let mut seed = small_seed();
    seed.comments = vec![seeded_comment(
        "c2",
        CreateCommentInput::on_change("top", ChangeId::new("C1")),
    )];
    let mut client = client_for(seed, "ada");
    run(async {
        client
            .create_comment(CreateCommentInput::reply_to("hi", CommentId::new("c2")))
            .await
            .unwrap();
    });
    assert_eq!(client.cached_replies(&CommentId::new("c2")), None);
}

#[test]
fn failed_mutations_leave_the_cache_alone() {
    let mut client = client_for(small_seed(), "ada");
    let query = CommentsQuery::Change(ChangeId::new("C1"));
    run(async {
        client.fetch_comments(query.clone()).await.unwrap();
        let before = client.cache().clone();

        let err = client
            .create_comment(CreateCommentInput::on_change("  ", ChangeId::new("C1")))
            .await
            .unwrap_err();
        assert_eq!(err, Error::EmptyMessage);

        let err = client
            .create_comment(CreateCommentInput::reply_to("hi", CommentId::new("ghost")))
            .await
            .unwrap_err();
        assert_eq!(err, Error::not_found("comment", "ghost"));

        client.gateway_mut().logout();
        let err = client
            .create_comment(CreateCommentInput::on_change("hi", ChangeId::new("C1")))
            .await
            .unwrap_err();
        assert_eq!(err, Error::PermissionDenied);

        assert_eq!(client.cache(), &before);
    });
}

#[test]
fn landing_refreshes_workspace_but_not_its_lists() {
    let mut seed = small_seed();
    seed.comments = vec![seeded_comment(
        "a",
        CreateCommentInput::on_workspace("please split this", WorkspaceId::new("w1")),
    )];
    let mut client = client_for(seed, "ada");
    let query = CommentsQuery::Workspace(WorkspaceId::new("w1"));

    let landed = run(async {
        client.fetch_comments(query.clone()).await.unwrap();
        client
            .land_workspace_change(LandWorkspaceChangeInput {
                workspace_id: WorkspaceId::new("w1"),
                patch_ids: vec![String::from("hunk-1")],
            })
            .await
            .unwrap()
    });

    assert_eq!(client.cached_workspace(&WorkspaceId::new("w1")), Some(landed));
    // landing does not touch cached lists, even though the server moved them
    assert_eq!(ids(client.cached_comments(&query)), vec![String::from("a")]);
    run(async { client.fetch_comments(query.clone()).await.unwrap() });
    assert_eq!(ids(client.cached_comments(&query)), Vec::<String>::new());
}

#[test]
fn reconciled_lists_match_a_refetch() {
    bolero::check!()
        .with_type::<Vec<(bool, u8)>>()
        .cloned()
        .for_each(|steps| {
            let mut seed = small_seed();
            seed.comments = (0..3)
                .map(|i| {
                    seeded_comment(
                        &format!("s{i}"),
                        CreateCommentInput::on_change("seeded", ChangeId::new("C1")),
                    )
                })
                .collect();
            let mut client = client_for(seed, "ada");
            let query = CommentsQuery::Change(ChangeId::new("C1"));
            run(async {
                client.fetch_comments(query.clone()).await.unwrap();
                let mut tops: Vec<CommentId> =
                    (0..3).map(|i| CommentId::new(format!("s{i}"))).collect();
                for (is_reply, pick) in steps.into_iter().take(16) {
                    let input = match is_reply {
                        true => CreateCommentInput::reply_to(
                            "reply",
                            tops[usize::from(pick) % tops.len()].clone(),
                        ),
                        false => CreateCommentInput::on_change("top", ChangeId::new("C1")),
                    };
                    let created = client.create_comment(input).await.unwrap();
                    if created.is_top() {
                        tops.push(created.id().clone());
                    }
                }

                let reconciled = client.cached_comments(&query);
                let replies: Vec<_> = tops.iter().map(|t| client.cached_replies(t)).collect();
                client.fetch_comments(query.clone()).await.unwrap();
                assert_eq!(client.cached_comments(&query), reconciled);
                for (t, before) in tops.iter().zip(replies) {
                    // replies of comments created since the fetch are not cached yet
                    if let Some(before) = before {
                        assert_eq!(client.cached_replies(t), Some(before));
                    }
                }
            });
        });
}

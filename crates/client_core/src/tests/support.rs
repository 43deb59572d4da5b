use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use shared::{
    domain::{CommentId, PersonId, PostId},
    protocol::{Comment, CreatedPost, NewPost, Person, COMMENTS_PATH, POSTS_PATH, USERS_PATH},
};
use tokio::sync::{Mutex, Notify};

use crate::{
    error::ClientError,
    transport::{DirectoryApi, PostsApi},
};

#[derive(Debug, Default)]
pub(crate) struct RecordedCalls {
    pub list_people: u32,
    pub created_posts: Vec<NewPost>,
    pub comment_lookups: Vec<PostId>,
}

/// In-memory API double. `None` in a response slot makes that call fail.
pub(crate) struct FakeApi {
    pub people: Option<Vec<Person>>,
    pub created: Option<CreatedPost>,
    /// Per-call create outcomes, consumed before falling back to `created`.
    pub create_script: Mutex<VecDeque<Option<CreatedPost>>>,
    pub comments: HashMap<PostId, Vec<Comment>>,
    pub comments_fail: bool,
    pub create_gate: Option<Arc<Notify>>,
    pub calls: Arc<Mutex<RecordedCalls>>,
}

impl FakeApi {
    pub fn ok() -> Self {
        Self {
            people: Some(vec![person(1, "Leanne Graham"), person(2, "Ervin Howell")]),
            created: Some(CreatedPost { id: PostId(101) }),
            comments: HashMap::from([(
                PostId(101),
                vec![
                    comment(1, "id labore ex et quam laborum", "laudantium enim quasi"),
                    comment(2, "quo vero reiciendis velit", "est natus enim nihil"),
                ],
            )]),
            create_script: Mutex::new(VecDeque::new()),
            comments_fail: false,
            create_gate: None,
            calls: Arc::new(Mutex::new(RecordedCalls::default())),
        }
    }

    pub fn failing_directory(mut self) -> Self {
        self.people = None;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.created = None;
        self
    }

    pub fn failing_comments(mut self) -> Self {
        self.comments_fail = true;
        self
    }

    pub fn with_created(mut self, post_id: PostId, comments: Vec<Comment>) -> Self {
        self.created = Some(CreatedPost { id: post_id });
        self.comments.insert(post_id, comments);
        self
    }

    pub fn with_create_script(self, outcomes: Vec<Option<PostId>>) -> Self {
        let script = outcomes
            .into_iter()
            .map(|outcome| outcome.map(|id| CreatedPost { id }))
            .collect();
        Self {
            create_script: Mutex::new(script),
            ..self
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }
}

fn unavailable(path: &'static str) -> ClientError {
    ClientError::Status { path, status: 503 }
}

#[async_trait]
impl DirectoryApi for FakeApi {
    async fn list_people(&self) -> Result<Vec<Person>, ClientError> {
        self.calls.lock().await.list_people += 1;
        self.people.clone().ok_or_else(|| unavailable(USERS_PATH))
    }
}

#[async_trait]
impl PostsApi for FakeApi {
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost, ClientError> {
        self.calls.lock().await.created_posts.push(post.clone());
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        let scripted = self.create_script.lock().await.pop_front();
        scripted
            .unwrap_or(self.created)
            .ok_or_else(|| unavailable(POSTS_PATH))
    }

    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ClientError> {
        self.calls.lock().await.comment_lookups.push(post_id);
        if self.comments_fail {
            return Err(unavailable(COMMENTS_PATH));
        }
        Ok(self.comments.get(&post_id).cloned().unwrap_or_default())
    }
}

pub(crate) fn person(id: i64, name: &str) -> Person {
    Person {
        id: PersonId(id),
        name: name.to_string(),
    }
}

pub(crate) fn comment(id: i64, name: &str, body: &str) -> Comment {
    Comment {
        id: CommentId(id),
        name: name.to_string(),
        body: body.to_string(),
    }
}

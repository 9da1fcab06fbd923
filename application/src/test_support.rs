//! Call-recording fakes for the outgoing ports, shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::EscalationSettings;
use crate::error::{AppError, AppResult};
use crate::ports::outgoing::ban_store::BanStorePort;
use crate::ports::outgoing::content_store::ContentStorePort;
use crate::ports::outgoing::moderation_config::ModerationConfigPort;
use crate::ports::outgoing::plain_mail::PlainMailPort;
use crate::ports::outgoing::template_loader::TemplateLoaderPort;
use crate::ports::outgoing::templated_message::TemplatedMessagePort;
use crate::ports::outgoing::user_directory::UserDirectoryPort;
use domain::{
    course::{CourseId, OrgId},
    moderation::{Ban, BanScope, ContentId, PurgeTarget},
    notification::{NotificationContext, OutboundMail, TemplateLookup, TemplatedMessage},
    user::{UserId, UserProfile},
};

pub(crate) struct FakeUserDirectory {
    users: Mutex<HashMap<i64, UserProfile>>,
    lookups: AtomicUsize,
}

impl FakeUserDirectory {
    pub(crate) fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(crate) fn insert(&self, id: i64, username: &str, email: &str) {
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id: UserId::new(id),
                username: username.to_string(),
                email: email.to_string(),
            },
        );
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserDirectoryPort for FakeUserDirectory {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().get(&user_id.as_i64()).cloned())
    }
}

pub(crate) struct FakeContentStore {
    threads: Mutex<Vec<String>>,
    comments: Mutex<Vec<String>>,
    already_gone: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    last_target: Mutex<Option<PurgeTarget>>,
    calls: AtomicUsize,
    deletes: AtomicUsize,
}

impl FakeContentStore {
    pub(crate) fn with_content(threads: Vec<String>, comments: Vec<String>) -> Self {
        Self {
            threads: Mutex::new(threads),
            comments: Mutex::new(comments),
            already_gone: Mutex::new(HashSet::new()),
            failing_deletes: Mutex::new(HashSet::new()),
            last_target: Mutex::new(None),
            calls: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn mark_already_gone(&self, id: &str) {
        self.already_gone.lock().unwrap().insert(id.to_string());
    }

    pub(crate) fn fail_delete_of(&self, id: &str) {
        self.failing_deletes.lock().unwrap().insert(id.to_string());
    }

    pub(crate) fn thread_count(&self) -> usize {
        self.threads.lock().unwrap().len()
    }

    pub(crate) fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub(crate) fn last_target(&self) -> Option<PurgeTarget> {
        self.last_target.lock().unwrap().clone()
    }

    fn note_target(&self, target: &PurgeTarget) {
        *self.last_target.lock().unwrap() = Some(target.clone());
    }

    fn delete_from(&self, collection: &Mutex<Vec<String>>, id: &ContentId) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.failing_deletes.lock().unwrap().contains(id.as_str()) {
            return Err(AppError::DatabaseError {
                message: format!("delete of {id} failed"),
            });
        }
        let mut items = collection.lock().unwrap();
        let Some(position) = items.iter().position(|item| item == id.as_str()) else {
            return Ok(false);
        };
        items.remove(position);
        if self.already_gone.lock().unwrap().contains(id.as_str()) {
            return Ok(false);
        }
        Ok(true)
    }
}

#[async_trait::async_trait]
impl ContentStorePort for FakeContentStore {
    async fn organization_for_course(&self, course_id: &CourseId) -> AppResult<OrgId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let org = course_id
            .as_str()
            .split_once(':')
            .map_or(course_id.as_str(), |(_, rest)| rest)
            .split('+')
            .next()
            .unwrap_or_default();
        Ok(OrgId::new(org))
    }

    async fn list_thread_ids(
        &self,
        _author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.note_target(target);
        Ok(self
            .threads
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(ContentId::new)
            .collect())
    }

    async fn list_comment_ids(
        &self,
        _author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.note_target(target);
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(ContentId::new)
            .collect())
    }

    async fn delete_thread(&self, id: &ContentId) -> AppResult<bool> {
        self.delete_from(&self.threads, id)
    }

    async fn delete_comment(&self, id: &ContentId) -> AppResult<bool> {
        self.delete_from(&self.comments, id)
    }

    async fn count_threads(&self, _author: UserId, target: &PurgeTarget) -> AppResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.note_target(target);
        Ok(self.threads.lock().unwrap().len() as u64)
    }

    async fn count_comments(&self, _author: UserId, target: &PurgeTarget) -> AppResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.note_target(target);
        Ok(self.comments.lock().unwrap().len() as u64)
    }
}

pub(crate) struct FakeBanStore {
    bans: Mutex<Vec<Ban>>,
}

impl FakeBanStore {
    pub(crate) fn new() -> Self {
        Self {
            bans: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded(&self) -> Vec<Ban> {
        self.bans.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BanStorePort for FakeBanStore {
    async fn record_ban(&self, ban: &Ban) -> AppResult<()> {
        let mut bans = self.bans.lock().unwrap();
        if let Some(existing) = bans.iter_mut().find(|b| {
            b.user_id == ban.user_id && b.course_id == ban.course_id && b.scope == ban.scope
        }) {
            *existing = ban.clone();
            existing.is_active = true;
        } else {
            bans.push(ban.clone());
        }
        Ok(())
    }

    async fn list_active_bans(&self, course_id: &CourseId, org: &OrgId) -> AppResult<Vec<Ban>> {
        Ok(self
            .bans
            .lock()
            .unwrap()
            .iter()
            .filter(|ban| {
                ban.is_active
                    && match ban.scope {
                        BanScope::Course => ban.course_id == *course_id,
                        BanScope::Organization => ban.org == *org,
                    }
            })
            .cloned()
            .collect())
    }
}

pub(crate) struct FakeConfigProvider {
    settings: Mutex<EscalationSettings>,
}

impl FakeConfigProvider {
    pub(crate) fn new(settings: EscalationSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

#[async_trait::async_trait]
impl ModerationConfigPort for FakeConfigProvider {
    async fn escalation_settings(&self) -> AppResult<EscalationSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }
}

pub(crate) struct FakeTemplatedTransport {
    messages: Mutex<Vec<TemplatedMessage>>,
}

impl FakeTemplatedTransport {
    pub(crate) fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<TemplatedMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TemplatedMessagePort for FakeTemplatedTransport {
    async fn send(&self, message: &TemplatedMessage) -> AppResult<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub(crate) struct FakePlainMail {
    mails: Mutex<Vec<OutboundMail>>,
    fail: bool,
}

impl FakePlainMail {
    pub(crate) fn new() -> Self {
        Self {
            mails: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            mails: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn sent(&self) -> Vec<OutboundMail> {
        self.mails.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlainMailPort for FakePlainMail {
    async fn send(&self, mail: &OutboundMail) -> AppResult<()> {
        if self.fail {
            return Err(AppError::ExternalServiceError {
                message: "SMTP connection refused".to_string(),
            });
        }
        self.mails.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub(crate) enum FakeTemplateLoader {
    NotFound,
    Rendered(String),
    Failing,
}

impl FakeTemplateLoader {
    pub(crate) fn not_found() -> Self {
        Self::NotFound
    }

    pub(crate) fn rendered(body: &str) -> Self {
        Self::Rendered(body.to_string())
    }

    pub(crate) fn failing() -> Self {
        Self::Failing
    }
}

#[async_trait::async_trait]
impl TemplateLoaderPort for FakeTemplateLoader {
    async fn render(
        &self,
        _template_name: &str,
        _context: &NotificationContext,
    ) -> AppResult<TemplateLookup> {
        match self {
            Self::NotFound => Ok(TemplateLookup::NotFound),
            Self::Rendered(body) => Ok(TemplateLookup::Rendered(body.clone())),
            Self::Failing => Err(AppError::TemplateError {
                message: "template rendering failed".to_string(),
            }),
        }
    }
}

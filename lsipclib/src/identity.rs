//! User and group name resolution.

/// Resolves numeric ids to account names.
pub trait IdentityResolver {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Resolver backed by the system account databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityResolver for SystemIdentity {
    fn user_name(&self, uid: u32) -> Option<String> {
        uzers::get_user_by_uid(uid).map(|user| user.name().to_string_lossy().into_owned())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        uzers::get_group_by_gid(gid).map(|group| group.name().to_string_lossy().into_owned())
    }
}

/// One-entry cache remembering the last resolved id.
///
/// Consecutive records usually share an owner, so this avoids most repeated
/// database lookups without holding on to more than one answer.
#[derive(Debug, Clone, Default)]
pub struct LastLookup {
    last: Option<(u32, Option<String>)>,
}

impl LastLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for `id`, falling back to the number itself.
    pub fn get_or_resolve(
        &mut self,
        id: u32,
        resolve: impl FnOnce(u32) -> Option<String>,
    ) -> String {
        match &self.last {
            Some((cached, name)) if *cached == id => {
                name.clone().unwrap_or_else(|| id.to_string())
            }
            _ => {
                let name = resolve(id);
                let display = name.clone().unwrap_or_else(|| id.to_string());
                self.last = Some((id, name));
                display
            }
        }
    }
}

/// Per-report name caches.
///
/// Owners and creators are cached in separate slots so that a creator lookup
/// never evicts, or is answered by, the owner's entry.
pub struct IdentityCache<'r> {
    resolver: &'r dyn IdentityResolver,
    users: LastLookup,
    groups: LastLookup,
    creator_users: LastLookup,
    creator_groups: LastLookup,
}

impl<'r> IdentityCache<'r> {
    pub fn new(resolver: &'r dyn IdentityResolver) -> Self {
        Self {
            resolver,
            users: LastLookup::new(),
            groups: LastLookup::new(),
            creator_users: LastLookup::new(),
            creator_groups: LastLookup::new(),
        }
    }

    pub fn user(&mut self, uid: u32) -> String {
        let resolver = self.resolver;
        self.users.get_or_resolve(uid, |id| resolver.user_name(id))
    }

    pub fn group(&mut self, gid: u32) -> String {
        let resolver = self.resolver;
        self.groups.get_or_resolve(gid, |id| resolver.group_name(id))
    }

    pub fn creator_user(&mut self, cuid: u32) -> String {
        let resolver = self.resolver;
        self.creator_users
            .get_or_resolve(cuid, |id| resolver.user_name(id))
    }

    pub fn creator_group(&mut self, cgid: u32) -> String {
        let resolver = self.resolver;
        self.creator_groups
            .get_or_resolve(cgid, |id| resolver.group_name(id))
    }
}

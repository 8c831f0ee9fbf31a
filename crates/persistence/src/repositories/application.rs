//! Recruit application repository: point lookups by normalized email,
//! lockout counter updates, profile patches, and the acceptance
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ApplicationEntity, MemberEntity};
use crate::metrics::QueryTimer;
use domain::models::ApplicationStatus;

/// Fields required to create an application document.
#[derive(Debug, Clone)]
pub struct NewApplication<'a> {
    /// Normalized institutional email; doubles as the document key.
    pub id: &'a str,
    pub name: &'a str,
    pub contact_email: &'a str,
    pub phone: &'a str,
    pub department: &'a str,
    pub student_id: &'a str,
    pub essay_motivation: &'a str,
    pub essay_experience: &'a str,
    pub essay_goals: &'a str,
    pub github_url: Option<&'a str>,
    pub portfolio_url: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Whitelisted self-service profile fields. `None` leaves a column as is.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub essay_motivation: Option<String>,
    pub essay_experience: Option<String>,
    pub essay_goals: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfilePatch {
    /// True when no whitelisted field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_email.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.student_id.is_none()
            && self.essay_motivation.is_none()
            && self.essay_experience.is_none()
            && self.essay_goals.is_none()
            && self.github_url.is_none()
            && self.portfolio_url.is_none()
    }
}

/// Result of the acceptance transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// A member was minted in this call; the caller may disclose the code.
    Created { member_id: Uuid },
    /// The application already carried a member; the original plaintext
    /// code cannot be re-disclosed.
    AlreadyAccepted { member_id: Uuid },
}

const APPLICATION_COLUMNS: &str = r#"
    id, name, email, contact_email, phone, department, student_id,
    essay_motivation, essay_experience, essay_goals, github_url, portfolio_url,
    password_hash, failed_attempts, locked_until, status, status_updated_by,
    accepted_member_id, decision_email_sent_at, created_at, updated_at
"#;

/// Repository for recruit application operations.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Creates a new ApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an application by its normalized email key.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_id");
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM recruit_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new application document.
    ///
    /// The primary key backs duplicate detection: a concurrent insert under
    /// the same normalized email surfaces as a unique violation.
    pub async fn create(
        &self,
        input: &NewApplication<'_>,
    ) -> Result<ApplicationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_application");
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            INSERT INTO recruit_applications
                (id, name, email, contact_email, phone, department, student_id,
                 essay_motivation, essay_experience, essay_goals, github_url,
                 portfolio_url, password_hash, status, failed_attempts, locked_until)
            VALUES ($1, $2, $1, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, NULL)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.contact_email)
        .bind(input.phone)
        .bind(input.department)
        .bind(input.student_id)
        .bind(input.essay_motivation)
        .bind(input.essay_experience)
        .bind(input.essay_goals)
        .bind(input.github_url)
        .bind(input.portfolio_url)
        .bind(input.password_hash)
        .bind(ApplicationStatus::Submitted.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Atomically count a failed login attempt, returning the incremented
    /// counter. A single UPDATE keeps concurrent failures from racing a
    /// read-modify-write cycle.
    pub async fn record_failed_attempt(&self, id: &str) -> Result<Option<i32>, sqlx::Error> {
        let timer = QueryTimer::new("record_failed_attempt");
        let result: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE recruit_applications
            SET failed_attempts = failed_attempts + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING failed_attempts
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(result.map(|row| row.0))
    }

    /// Reset the failure counter and lock after a successful login.
    pub async fn clear_failures(&self, id: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("clear_application_failures");
        sqlx::query(
            r#"
            UPDATE recruit_applications
            SET failed_attempts = 0, locked_until = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Enter the locked state: replace the stored credential with the
    /// temporary one, zero the counter, and set the lock expiry.
    pub async fn lock_with_temp_password(
        &self,
        id: &str,
        password_hash: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("lock_application");
        sqlx::query(
            r#"
            UPDATE recruit_applications
            SET password_hash = $2, failed_attempts = 0, locked_until = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(locked_until)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Replace the stored credential and clear any lock (password reset).
    pub async fn replace_credential(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("replace_application_credential");
        sqlx::query(
            r#"
            UPDATE recruit_applications
            SET password_hash = $2, failed_attempts = 0, locked_until = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Apply a self-service profile patch. Absent fields keep their value.
    pub async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_application_profile");
        let result = sqlx::query(
            r#"
            UPDATE recruit_applications
            SET name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email),
                phone = COALESCE($4, phone),
                department = COALESCE($5, department),
                student_id = COALESCE($6, student_id),
                essay_motivation = COALESCE($7, essay_motivation),
                essay_experience = COALESCE($8, essay_experience),
                essay_goals = COALESCE($9, essay_goals),
                github_url = COALESCE($10, github_url),
                portfolio_url = COALESCE($11, portfolio_url),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.contact_email.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.department.as_deref())
        .bind(patch.student_id.as_deref())
        .bind(patch.essay_motivation.as_deref())
        .bind(patch.essay_experience.as_deref())
        .bind(patch.essay_goals.as_deref())
        .bind(patch.github_url.as_deref())
        .bind(patch.portfolio_url.as_deref())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Merge-update the review status (every transition except acceptance).
    pub async fn set_status(
        &self,
        id: &str,
        status: &str,
        updated_by: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_application_status");
        let result = sqlx::query(
            r#"
            UPDATE recruit_applications
            SET status = $2, status_updated_by = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(updated_by)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Claim the one-shot decision notification. Returns true only for the
    /// caller that flipped `decision_email_sent_at` from NULL.
    pub async fn claim_decision_notification(&self, id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("claim_decision_notification");
        let result = sqlx::query(
            r#"
            UPDATE recruit_applications
            SET decision_email_sent_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND decision_email_sent_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List applications for the admin review screen, newest first, with
    /// optional status filter and keyset cursor.
    pub async fn list(
        &self,
        status: Option<&str>,
        cursor: Option<(DateTime<Utc>, &str)>,
        limit: i64,
    ) -> Result<Vec<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_applications");
        let (cursor_at, cursor_id) = match cursor {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM recruit_applications
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3::text))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#
        ))
        .bind(status)
        .bind(cursor_at)
        .bind(cursor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The acceptance transaction: re-read the application under a row
    /// lock, short-circuit if it already carries a member, otherwise mint
    /// the member record and mark the application accepted atomically.
    ///
    /// Returns `None` for an unknown application id.
    pub async fn accept(
        &self,
        id: &str,
        admin_id: &str,
        generation: i32,
        link_code_hash: &str,
        link_code_expires_at: DateTime<Utc>,
    ) -> Result<Option<AcceptOutcome>, sqlx::Error> {
        let timer = QueryTimer::new("accept_application");

        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, ApplicationEntity>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM recruit_applications WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(application) = application else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        // Retried or concurrent accepts converge on the first member.
        if let Some(member_id) = application.accepted_member_id {
            tx.commit().await?;
            timer.record();
            return Ok(Some(AcceptOutcome::AlreadyAccepted { member_id }));
        }

        let member = sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members
                (email, name, phone, department, student_id, role, generation,
                 link_code_hash, link_code_expires_at, link_code_used_at)
            VALUES ($1, $2, $3, $4, $5, 'member', $6, $7, $8, NULL)
            RETURNING id, email, name, phone, department, student_id, role, generation,
                      link_code_hash, link_code_expires_at, link_code_used_at,
                      created_at, updated_at
            "#,
        )
        .bind(&application.email)
        .bind(&application.name)
        .bind(&application.phone)
        .bind(&application.department)
        .bind(&application.student_id)
        .bind(generation)
        .bind(link_code_hash)
        .bind(link_code_expires_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE recruit_applications
            SET status = $4, accepted_member_id = $2, status_updated_by = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(member.id)
        .bind(admin_id)
        .bind(ApplicationStatus::Accepted.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(AcceptOutcome::Created { member_id: member.id }))
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and gym memberships (identity and per-gym roles)
//! - Gyms, locations
//! - Clients (including embedded benchmark records)
//! - Programs (templates and assigned copies)
//! - Weekly schedules (templates and active instances)
//! - Workout sessions

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    BenchmarkTemplate, Client, Gym, GymMembership, Location, Program, User, WeeklySchedule,
    WorkoutSession,
};
use serde::{de::DeserializeOwned, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_doc<T>(&self, collection: &str, id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.upsert_doc(collections::USERS, &user.id, user).await
    }

    // ─── Gym Operations ──────────────────────────────────────────

    pub async fn get_gym(&self, gym_id: &str) -> Result<Option<Gym>, AppError> {
        self.get_doc(collections::GYMS, gym_id).await
    }

    pub async fn get_gym_by_email(&self, email: &str) -> Result<Option<Gym>, AppError> {
        let email = email.to_lowercase();
        let gyms: Vec<Gym> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::GYMS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(gyms.into_iter().next())
    }

    /// All gyms, newest first (admin listing).
    pub async fn list_gyms(&self) -> Result<Vec<Gym>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GYMS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_gym(&self, gym: &Gym) -> Result<(), AppError> {
        self.upsert_doc(collections::GYMS, &gym.id, gym).await
    }

    pub async fn delete_gym(&self, gym_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::GYMS, gym_id).await
    }

    // ─── Membership Operations ───────────────────────────────────

    /// Membership of a user within a gym, regardless of status.
    pub async fn get_membership(
        &self,
        user_id: &str,
        gym_id: &str,
    ) -> Result<Option<GymMembership>, AppError> {
        let user_id = user_id.to_string();
        let gym_id = gym_id.to_string();
        let memberships: Vec<GymMembership> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::GYM_MEMBERSHIPS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("gym_id").eq(gym_id.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(memberships.into_iter().next())
    }

    /// Active memberships of a gym.
    pub async fn list_memberships_for_gym(
        &self,
        gym_id: &str,
    ) -> Result<Vec<GymMembership>, AppError> {
        let gym_id = gym_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GYM_MEMBERSHIPS)
            .filter(move |q| {
                q.for_all([
                    q.field("gym_id").eq(gym_id.clone()),
                    q.field("status").eq("active"),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active memberships of a user across gyms.
    pub async fn list_memberships_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<GymMembership>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GYM_MEMBERSHIPS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("status").eq("active"),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_membership(&self, membership: &GymMembership) -> Result<(), AppError> {
        self.upsert_doc(collections::GYM_MEMBERSHIPS, &membership.id, membership)
            .await
    }

    pub async fn delete_membership(&self, membership_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::GYM_MEMBERSHIPS, membership_id)
            .await
    }

    // ─── Client Operations ───────────────────────────────────────

    pub async fn get_client_doc(&self, client_id: &str) -> Result<Option<Client>, AppError> {
        self.get_doc(collections::CLIENTS, client_id).await
    }

    /// Client record linked to a login account within a gym.
    pub async fn get_client_by_user(
        &self,
        gym_id: &str,
        user_id: &str,
    ) -> Result<Option<Client>, AppError> {
        let gym_id = gym_id.to_string();
        let user_id = user_id.to_string();
        let clients: Vec<Client> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CLIENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("gym_id").eq(gym_id.clone()),
                    q.field("user_id").eq(user_id.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(clients.into_iter().next())
    }

    pub async fn list_clients_for_gym(&self, gym_id: &str) -> Result<Vec<Client>, AppError> {
        let gym_id = gym_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CLIENTS)
            .filter(move |q| q.for_all([q.field("gym_id").eq(gym_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active clients with an assigned program; gym-scoped or global
    /// (global is what the weekly auto-progression pass walks).
    pub async fn list_active_clients_with_program(
        &self,
        gym_id: Option<&str>,
    ) -> Result<Vec<Client>, AppError> {
        let gym_id = gym_id.map(str::to_string);
        let clients: Vec<Client> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CLIENTS)
            .filter(move |q| {
                let mut conditions = vec![q.field("membership_status").eq("active")];
                if let Some(gym_id) = &gym_id {
                    conditions.push(q.field("gym_id").eq(gym_id.clone()));
                }
                q.for_all(conditions)
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Firestore has no "field exists" filter worth relying on here;
        // drop programless clients in memory.
        Ok(clients
            .into_iter()
            .filter(|c| c.program_id.is_some())
            .collect())
    }

    pub async fn upsert_client(&self, client: &Client) -> Result<(), AppError> {
        self.upsert_doc(collections::CLIENTS, &client.id, client)
            .await
    }

    pub async fn delete_client(&self, client_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::CLIENTS, client_id).await
    }

    // ─── Program Operations ──────────────────────────────────────

    pub async fn get_program(&self, program_id: &str) -> Result<Option<Program>, AppError> {
        self.get_doc(collections::PROGRAMS, program_id).await
    }

    pub async fn list_programs_for_gym(
        &self,
        gym_id: &str,
        is_template: Option<bool>,
    ) -> Result<Vec<Program>, AppError> {
        let gym_id = gym_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROGRAMS)
            .filter(move |q| {
                let mut conditions = vec![q.field("gym_id").eq(gym_id.clone())];
                if let Some(is_template) = is_template {
                    conditions.push(q.field("is_template").eq(is_template));
                }
                q.for_all(conditions)
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assigned copies created from a template (for template propagation).
    pub async fn list_programs_for_template(
        &self,
        gym_id: &str,
        template_id: &str,
    ) -> Result<Vec<Program>, AppError> {
        let gym_id = gym_id.to_string();
        let template_id = template_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROGRAMS)
            .filter(move |q| {
                q.for_all([
                    q.field("gym_id").eq(gym_id.clone()),
                    q.field("template_id").eq(template_id.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_program(&self, program: &Program) -> Result<(), AppError> {
        self.upsert_doc(collections::PROGRAMS, &program.id, program)
            .await
    }

    pub async fn delete_program(&self, program_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::PROGRAMS, program_id).await
    }

    // ─── Benchmark Template Operations ───────────────────────────

    pub async fn get_benchmark_template(
        &self,
        template_id: &str,
    ) -> Result<Option<BenchmarkTemplate>, AppError> {
        self.get_doc(collections::BENCHMARK_TEMPLATES, template_id)
            .await
    }

    pub async fn list_benchmark_templates(&self) -> Result<Vec<BenchmarkTemplate>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::BENCHMARK_TEMPLATES)
            .order_by([("name", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_benchmark_template(
        &self,
        template: &BenchmarkTemplate,
    ) -> Result<(), AppError> {
        self.upsert_doc(collections::BENCHMARK_TEMPLATES, &template.id, template)
            .await
    }

    pub async fn delete_benchmark_template(&self, template_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::BENCHMARK_TEMPLATES, template_id)
            .await
    }

    // ─── Location Operations ─────────────────────────────────────

    pub async fn get_location(&self, location_id: &str) -> Result<Option<Location>, AppError> {
        self.get_doc(collections::LOCATIONS, location_id).await
    }

    pub async fn list_locations_for_gym(&self, gym_id: &str) -> Result<Vec<Location>, AppError> {
        let gym_id = gym_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LOCATIONS)
            .filter(move |q| q.for_all([q.field("gym_id").eq(gym_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_location(&self, location: &Location) -> Result<(), AppError> {
        self.upsert_doc(collections::LOCATIONS, &location.id, location)
            .await
    }

    pub async fn delete_location(&self, location_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::LOCATIONS, location_id).await
    }

    // ─── Schedule Operations ─────────────────────────────────────

    pub async fn get_schedule(
        &self,
        schedule_id: &str,
    ) -> Result<Option<WeeklySchedule>, AppError> {
        self.get_doc(collections::SCHEDULES, schedule_id).await
    }

    pub async fn list_schedules_for_gym(
        &self,
        gym_id: &str,
        is_template: Option<bool>,
    ) -> Result<Vec<WeeklySchedule>, AppError> {
        let gym_id = gym_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SCHEDULES)
            .filter(move |q| {
                let mut conditions = vec![q.field("gym_id").eq(gym_id.clone())];
                if let Some(is_template) = is_template {
                    conditions.push(q.field("is_template").eq(is_template));
                }
                q.for_all(conditions)
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A coach's schedules, newest first.
    pub async fn list_schedules_for_coach(
        &self,
        gym_id: &str,
        coach_id: &str,
        is_template: Option<bool>,
    ) -> Result<Vec<WeeklySchedule>, AppError> {
        let gym_id = gym_id.to_string();
        let coach_id = coach_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SCHEDULES)
            .filter(move |q| {
                let mut conditions = vec![
                    q.field("gym_id").eq(gym_id.clone()),
                    q.field("coach_id").eq(coach_id.clone()),
                ];
                if let Some(is_template) = is_template {
                    conditions.push(q.field("is_template").eq(is_template));
                }
                q.for_all(conditions)
            })
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active (non-template) schedules materialized from a template.
    pub async fn list_schedules_for_template(
        &self,
        template_id: &str,
    ) -> Result<Vec<WeeklySchedule>, AppError> {
        let template_id = template_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SCHEDULES)
            .filter(move |q| {
                q.for_all([
                    q.field("template_id").eq(template_id.clone()),
                    q.field("is_template").eq(false),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn count_schedules_for_coach(
        &self,
        gym_id: &str,
        coach_id: &str,
    ) -> Result<usize, AppError> {
        Ok(self
            .list_schedules_for_coach(gym_id, coach_id, None)
            .await?
            .len())
    }

    pub async fn upsert_schedule(&self, schedule: &WeeklySchedule) -> Result<(), AppError> {
        self.upsert_doc(collections::SCHEDULES, &schedule.id, schedule)
            .await
    }

    pub async fn delete_schedule(&self, schedule_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::SCHEDULES, schedule_id).await
    }

    /// Atomically mutate one schedule document inside a transaction.
    ///
    /// The schedule is re-read with the transaction open, `mutate` runs
    /// against that snapshot (returning an error aborts without writing),
    /// and the write only commits if the document was not changed
    /// concurrently — Firestore retries the commit on conflict, which is
    /// what keeps enroll capacity checks honest under concurrent requests.
    pub async fn mutate_schedule_atomic<F>(
        &self,
        schedule_id: &str,
        mutate: F,
    ) -> Result<WeeklySchedule, AppError>
    where
        F: FnOnce(&mut WeeklySchedule) -> Result<(), AppError>,
    {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the current document state with the transaction open so the
        // commit can detect concurrent modification.
        let schedule: Option<WeeklySchedule> = client
            .fluent()
            .select()
            .by_id_in(collections::SCHEDULES)
            .obj()
            .one(schedule_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read schedule in transaction: {}", e))
            })?;

        let mut schedule = match schedule {
            Some(schedule) => schedule,
            None => {
                let _ = transaction.rollback().await;
                return Err(AppError::NotFound("Schedule not found".to_string()));
            }
        };

        if let Err(err) = mutate(&mut schedule) {
            let _ = transaction.rollback().await;
            return Err(err);
        }

        client
            .fluent()
            .update()
            .in_col(collections::SCHEDULES)
            .document_id(&schedule.id)
            .object(&schedule)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add schedule to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(schedule)
    }

    // ─── Workout Session Operations ──────────────────────────────

    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<WorkoutSession>, AppError> {
        self.get_doc(collections::WORKOUT_SESSIONS, session_id)
            .await
    }

    /// All currently-active sessions for a client (normally zero or one).
    pub async fn list_active_sessions_for_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<WorkoutSession>, AppError> {
        let client_id = client_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_SESSIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("client_id").eq(client_id.clone()),
                    q.field("is_active").eq(true),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The active session pinned to a specific program position, if any.
    pub async fn find_active_session(
        &self,
        client_id: &str,
        gym_id: &str,
        block: u32,
        week: u32,
        day: u32,
    ) -> Result<Option<WorkoutSession>, AppError> {
        let client_id = client_id.to_string();
        let gym_id = gym_id.to_string();
        let sessions: Vec<WorkoutSession> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_SESSIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("client_id").eq(client_id.clone()),
                    q.field("gym_id").eq(gym_id.clone()),
                    q.field("block").eq(block),
                    q.field("week").eq(week),
                    q.field("day").eq(day),
                    q.field("is_active").eq(true),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(sessions.into_iter().next())
    }

    pub async fn upsert_session(&self, session: &WorkoutSession) -> Result<(), AppError> {
        self.upsert_doc(collections::WORKOUT_SESSIONS, &session.id, session)
            .await
    }
}

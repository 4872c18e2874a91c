// ── Guest-facing resources ──
//
// Properties, settings, guests, activities, dining, streaming services,
// property information, background images and images. List mutations
// follow one rule: apply locally under an `OperationId`, send, then commit
// or roll back.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use innkeep_api::{ApiClient, ImageUpload};
use tracing::debug;

use super::Console;
use crate::error::CoreError;
use crate::image::{self, ImageForm, ProxiedImage};
use crate::listing;
use crate::model::{
    Activity, ActivityInput, BackgroundImage, DashboardStats, DiningInput, DiningPlace, Entity,
    EntityId, Guest, GuestInput, GuestStatus, ImageCheck, ImageSearchResult, OrderEntry, Ordered,
    Property, PropertyInfoInput, PropertyInfoItem, PropertyInput, Settings, StreamingInput,
    StreamingService, Toggleable,
};
use crate::ordering::{self, Direction, Reorder};
use crate::presets;
use crate::store::{Edit, EntityCollection, OperationId};

type ApiResult<T> = Result<T, innkeep_api::Error>;

/// How to move an ordered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// One slot up or down.
    Step(Direction),
    /// Drag-and-drop to an index, clamped to the last slot.
    To(usize),
}

impl From<Direction> for Move {
    fn from(direction: Direction) -> Self {
        Self::Step(direction)
    }
}

fn not_found<T: Entity>(id: &EntityId) -> CoreError {
    CoreError::NotFound {
        entity_type: T::KIND.into(),
        identifier: id.to_string(),
    }
}

impl Console {
    // ── Generic list plumbing ────────────────────────────────────────

    /// Fetch one scope and replace it in `collection`. Never notifies.
    pub(super) async fn refresh<T, Fut>(
        collection: &EntityCollection<T>,
        scope: Option<&EntityId>,
        fetch: Fut,
    ) -> Result<Vec<Arc<T>>, CoreError>
    where
        T: Entity,
        Fut: Future<Output = ApiResult<Vec<T>>>,
    {
        let items = fetch.await?;
        debug!(kind = T::KIND, count = items.len(), "refreshed");
        collection.replace_scope(scope, items);
        Ok(collection.scoped(scope))
    }

    /// Store a created or updated entity and report it.
    fn saved<T: Entity>(
        &self,
        collection: &EntityCollection<T>,
        result: Result<T, CoreError>,
        verb: &str,
    ) -> Result<Arc<T>, CoreError> {
        let result = result.map(|entity| {
            let id = entity.entity_id().clone();
            collection.upsert(entity);
            collection.get(&id)
        });
        match result {
            Ok(Some(entity)) => {
                self.inner
                    .notifier
                    .success(format!("{} {} {verb}", T::KIND, entity.label()));
                Ok(entity)
            }
            Ok(None) => Err(self.fail(CoreError::Internal(format!(
                "{} vanished after save",
                T::KIND
            )))),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Flip `is_active` optimistically, then persist.
    async fn toggle<T, F, Fut>(
        &self,
        collection: &EntityCollection<T>,
        id: &EntityId,
        send: F,
    ) -> Result<Arc<T>, CoreError>
    where
        T: Entity + Toggleable,
        F: FnOnce(Arc<ApiClient>, EntityId, bool) -> Fut,
        Fut: Future<Output = ApiResult<Option<T>>>,
    {
        let result: Result<Arc<T>, CoreError> = async {
            let current = collection.get(id).ok_or_else(|| not_found::<T>(id))?;
            let active = !current.is_active();
            let op = OperationId::new();
            let applied = collection
                .apply_optimistic(op, id, move |e| e.set_active(active))
                .ok_or_else(|| not_found::<T>(id))?;
            let outcome = send(self.client(), id.clone(), active).await;
            Self::settle(collection, op, outcome, |echo| echo.clone())?;
            Ok(collection.get(id).unwrap_or(applied))
        }
        .await;

        self.finish(result, |entity| {
            let state = if entity.is_active() {
                "activated"
            } else {
                "deactivated"
            };
            format!("{} {} {state}", T::KIND, entity.label())
        })
    }

    /// Reorder locally (dense renumber), then persist. `persist` receives
    /// the single move and the full renumbered set; each resource sends
    /// whichever its endpoint takes.
    async fn reorder<T, F, Fut>(
        &self,
        collection: &EntityCollection<T>,
        id: &EntityId,
        movement: Move,
        persist: F,
    ) -> Result<Vec<Arc<T>>, CoreError>
    where
        T: Entity + Ordered,
        F: FnOnce(Arc<ApiClient>, Reorder, Vec<OrderEntry>) -> Fut,
        Fut: Future<Output = ApiResult<()>>,
    {
        let result: Result<Vec<Arc<T>>, CoreError> = async {
            let current = collection.get(id).ok_or_else(|| not_found::<T>(id))?;
            let scope = current.scope().cloned();
            let mut items: Vec<T> = collection
                .scoped(scope.as_ref())
                .iter()
                .map(|e| (**e).clone())
                .collect();

            let moved = match movement {
                Move::Step(direction) => ordering::move_item(&mut items, id, direction),
                Move::To(index) => ordering::move_to(&mut items, id, index),
            };
            let Some(reorder) = moved else {
                return Err(CoreError::ValidationFailed {
                    message: format!("{} {} cannot move further", T::KIND, current.label()),
                });
            };

            let entries = OrderEntry::from_items(&items);
            let edits = entries
                .iter()
                .map(|entry| {
                    let order = entry.display_order;
                    let edit: Edit<T> = Arc::new(move |e: &mut T| e.set_display_order(order));
                    (entry.id.clone(), edit)
                })
                .collect();
            let op = OperationId::new();
            collection.apply_optimistic_all(op, edits);
            let outcome = persist(self.client(), reorder, entries).await;
            Self::settle(collection, op, outcome, |()| None)?;

            let mut list = collection.scoped(scope.as_ref());
            listing::by_display_order(&mut list);
            Ok(list)
        }
        .await;

        self.finish(result, |_| format!("{} order saved", T::KIND))
    }

    /// Remove locally, then delete on the server; restored on failure.
    async fn delete<T, F, Fut>(
        &self,
        collection: &EntityCollection<T>,
        id: &EntityId,
        send: F,
    ) -> Result<(), CoreError>
    where
        T: Entity,
        F: FnOnce(Arc<ApiClient>, EntityId) -> Fut,
        Fut: Future<Output = ApiResult<()>>,
    {
        let op = OperationId::new();
        let label = collection
            .remove_optimistic(op, id)
            .map_or_else(|| id.to_string(), |e| e.label());
        let outcome = send(self.client(), id.clone()).await;
        let result = Self::settle(collection, op, outcome, |()| None);
        self.finish(result, |()| format!("{} {label} deleted", T::KIND))
    }

    /// Resolve an image form into the URL to store, if any.
    async fn attach_image(&self, form: &ImageForm) -> Result<Option<String>, CoreError> {
        form.resolve(&self.client()).await
    }

    // ── Properties ───────────────────────────────────────────────────

    pub(crate) async fn fetch_properties(&self) -> Result<Vec<Arc<Property>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.properties, None, client.list_properties()).await
    }

    pub async fn list_properties(&self) -> Result<Vec<Arc<Property>>, CoreError> {
        let result = self.fetch_properties().await;
        self.read(result)
    }

    pub async fn get_property(&self, id: &EntityId) -> Result<Arc<Property>, CoreError> {
        let result: Result<Arc<Property>, CoreError> = async {
            let property = self.client().get_property(id).await?;
            self.inner.store.properties.upsert(property);
            self.inner
                .store
                .properties
                .get(id)
                .ok_or_else(|| not_found::<Property>(id))
        }
        .await;
        self.read(result)
    }

    pub async fn create_property(&self, input: &PropertyInput) -> Result<Arc<Property>, CoreError> {
        let result = self.client().create_property(input).await.map_err(Into::into);
        self.saved(&self.inner.store.properties, result, "created")
    }

    pub async fn update_property(
        &self,
        id: &EntityId,
        input: &PropertyInput,
    ) -> Result<Arc<Property>, CoreError> {
        let result = self.client().update_property(id, input).await.map_err(Into::into);
        self.saved(&self.inner.store.properties, result, "updated")
    }

    pub async fn delete_property(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.properties, id, |c, id| async move {
            c.delete_property(&id).await
        })
        .await
    }

    // ── Settings and dashboard ───────────────────────────────────────

    pub async fn settings(&self) -> Result<Settings, CoreError> {
        let result = self.client().get_settings().await.map_err(Into::into);
        self.read(result)
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        let result = self.client().update_settings(settings).await.map_err(Into::into);
        self.finish(result, |()| "Settings saved".into())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, CoreError> {
        let result = self.client().dashboard_stats().await.map_err(Into::into);
        self.read(result)
    }

    // ── Guests ───────────────────────────────────────────────────────

    pub(crate) async fn fetch_guests(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<Guest>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.guests, scope, client.list_guests(scope)).await
    }

    pub async fn list_guests(&self, scope: Option<&EntityId>) -> Result<Vec<Arc<Guest>>, CoreError> {
        let result = self.fetch_guests(scope).await;
        self.read(result)
    }

    pub async fn get_guest(&self, id: &EntityId) -> Result<Arc<Guest>, CoreError> {
        let result: Result<Arc<Guest>, CoreError> = async {
            let guest = self.client().get_guest(id).await?;
            self.inner.store.guests.upsert(guest);
            self.inner
                .store
                .guests
                .get(id)
                .ok_or_else(|| not_found::<Guest>(id))
        }
        .await;
        self.read(result)
    }

    pub async fn create_guest(&self, input: &GuestInput) -> Result<Arc<Guest>, CoreError> {
        let result = self.client().create_guest(input).await.map_err(Into::into);
        self.saved(&self.inner.store.guests, result, "created")
    }

    pub async fn update_guest(
        &self,
        id: &EntityId,
        input: &GuestInput,
    ) -> Result<Arc<Guest>, CoreError> {
        let result = self.client().update_guest(id, input).await.map_err(Into::into);
        self.saved(&self.inner.store.guests, result, "updated")
    }

    /// Optimistic status change (check in / check out by hand).
    pub async fn set_guest_status(
        &self,
        id: &EntityId,
        status: GuestStatus,
    ) -> Result<Arc<Guest>, CoreError> {
        let guests = &self.inner.store.guests;
        let result: Result<Arc<Guest>, CoreError> = async {
            let op = OperationId::new();
            let applied = guests
                .apply_optimistic(op, id, move |g| g.status = status)
                .ok_or_else(|| not_found::<Guest>(id))?;
            let outcome = self.client().set_guest_status(id, status).await;
            Self::settle(guests, op, outcome, |echo| echo.clone())?;
            Ok(guests.get(id).unwrap_or(applied))
        }
        .await;
        self.finish(result, |g| format!("{} is now {}", g.label(), g.status))
    }

    pub async fn delete_guest(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.guests, id, |c, id| async move {
            c.delete_guest(&id).await
        })
        .await
    }

    // ── Activities ───────────────────────────────────────────────────

    pub(crate) async fn fetch_activities(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<Activity>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.activities, scope, client.list_activities(scope)).await
    }

    pub async fn list_activities(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<Activity>>, CoreError> {
        let result = self.fetch_activities(scope).await;
        self.read(result)
    }

    /// Create an activity; a chosen image is resolved first and only its
    /// resulting URL is submitted.
    pub async fn create_activity(
        &self,
        mut input: ActivityInput,
        image: &ImageForm,
    ) -> Result<Arc<Activity>, CoreError> {
        let result: Result<Activity, CoreError> = async {
            if let Some(url) = self.attach_image(image).await? {
                input.image_url = Some(url);
            }
            Ok(self.client().create_activity(&input).await?)
        }
        .await;
        self.saved(&self.inner.store.activities, result, "created")
    }

    pub async fn update_activity(
        &self,
        id: &EntityId,
        mut input: ActivityInput,
        image: &ImageForm,
    ) -> Result<Arc<Activity>, CoreError> {
        let result: Result<Activity, CoreError> = async {
            if let Some(url) = self.attach_image(image).await? {
                input.image_url = Some(url);
            }
            Ok(self.client().update_activity(id, &input).await?)
        }
        .await;
        self.saved(&self.inner.store.activities, result, "updated")
    }

    pub async fn toggle_activity(&self, id: &EntityId) -> Result<Arc<Activity>, CoreError> {
        self.toggle(&self.inner.store.activities, id, |c, id, active| async move {
            c.toggle_activity(&id, active).await
        })
        .await
    }

    /// Activities persist only the moved row: `PATCH /:id/order`.
    pub async fn move_activity(
        &self,
        id: &EntityId,
        movement: impl Into<Move>,
    ) -> Result<Vec<Arc<Activity>>, CoreError> {
        self.reorder(
            &self.inner.store.activities,
            id,
            movement.into(),
            |c, reorder, _| async move { c.move_activity(&reorder.id, reorder.new_index).await },
        )
        .await
    }

    pub async fn delete_activity(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.activities, id, |c, id| async move {
            c.delete_activity(&id).await
        })
        .await
    }

    // ── Dining ───────────────────────────────────────────────────────

    pub(crate) async fn fetch_dining(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<DiningPlace>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.dining, scope, client.list_dining(scope)).await
    }

    pub async fn list_dining(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<DiningPlace>>, CoreError> {
        let result = self.fetch_dining(scope).await;
        self.read(result)
    }

    pub async fn create_dining(
        &self,
        mut input: DiningInput,
        image: &ImageForm,
    ) -> Result<Arc<DiningPlace>, CoreError> {
        let result: Result<DiningPlace, CoreError> = async {
            if let Some(url) = self.attach_image(image).await? {
                input.image_url = Some(url);
            }
            Ok(self.client().create_dining(&input).await?)
        }
        .await;
        self.saved(&self.inner.store.dining, result, "created")
    }

    pub async fn update_dining(
        &self,
        id: &EntityId,
        mut input: DiningInput,
        image: &ImageForm,
    ) -> Result<Arc<DiningPlace>, CoreError> {
        let result: Result<DiningPlace, CoreError> = async {
            if let Some(url) = self.attach_image(image).await? {
                input.image_url = Some(url);
            }
            Ok(self.client().update_dining(id, &input).await?)
        }
        .await;
        self.saved(&self.inner.store.dining, result, "updated")
    }

    pub async fn toggle_dining(&self, id: &EntityId) -> Result<Arc<DiningPlace>, CoreError> {
        self.toggle(&self.inner.store.dining, id, |c, id, active| async move {
            c.toggle_dining(&id, active).await
        })
        .await
    }

    pub async fn delete_dining(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.dining, id, |c, id| async move {
            c.delete_dining(&id).await
        })
        .await
    }

    // ── Streaming services ───────────────────────────────────────────

    pub(crate) async fn fetch_streaming(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<StreamingService>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.streaming, scope, client.list_streaming(scope)).await
    }

    pub async fn list_streaming(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<StreamingService>>, CoreError> {
        let result = self.fetch_streaming(scope).await;
        self.read(result)
    }

    pub async fn create_streaming(
        &self,
        input: &StreamingInput,
    ) -> Result<Arc<StreamingService>, CoreError> {
        let result = self.client().create_streaming(input).await.map_err(Into::into);
        self.saved(&self.inner.store.streaming, result, "created")
    }

    /// One-click creation from the built-in preset table.
    pub async fn create_streaming_from_preset(
        &self,
        preset: &str,
        property_id: Option<EntityId>,
    ) -> Result<Arc<StreamingService>, CoreError> {
        let Some(found) = presets::find(preset) else {
            return Err(self.fail(CoreError::ValidationFailed {
                message: format!("unknown streaming preset {preset:?}"),
            }));
        };
        self.create_streaming(&found.to_input(property_id)).await
    }

    pub async fn update_streaming(
        &self,
        id: &EntityId,
        input: &StreamingInput,
    ) -> Result<Arc<StreamingService>, CoreError> {
        let result = self.client().update_streaming(id, input).await.map_err(Into::into);
        self.saved(&self.inner.store.streaming, result, "updated")
    }

    pub async fn toggle_streaming(&self, id: &EntityId) -> Result<Arc<StreamingService>, CoreError> {
        self.toggle(&self.inner.store.streaming, id, |c, id, active| async move {
            c.toggle_streaming(&id, active).await
        })
        .await
    }

    /// Streaming services persist the full renumbered set: `PUT /reorder`.
    pub async fn move_streaming(
        &self,
        id: &EntityId,
        movement: impl Into<Move>,
    ) -> Result<Vec<Arc<StreamingService>>, CoreError> {
        self.reorder(
            &self.inner.store.streaming,
            id,
            movement.into(),
            |c, _, entries| async move { c.reorder_streaming(&entries).await },
        )
        .await
    }

    pub async fn delete_streaming(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.streaming, id, |c, id| async move {
            c.delete_streaming(&id).await
        })
        .await
    }

    // ── Property information ─────────────────────────────────────────

    pub(crate) async fn fetch_property_info(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<PropertyInfoItem>>, CoreError> {
        let client = self.client();
        Self::refresh(
            &self.inner.store.property_info,
            scope,
            client.list_property_info(scope),
        )
        .await
    }

    pub async fn list_property_info(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<PropertyInfoItem>>, CoreError> {
        let result = self.fetch_property_info(scope).await;
        self.read(result)
    }

    pub async fn create_property_info(
        &self,
        input: &PropertyInfoInput,
    ) -> Result<Arc<PropertyInfoItem>, CoreError> {
        let result = self.client().create_property_info(input).await.map_err(Into::into);
        self.saved(&self.inner.store.property_info, result, "created")
    }

    pub async fn update_property_info(
        &self,
        id: &EntityId,
        input: &PropertyInfoInput,
    ) -> Result<Arc<PropertyInfoItem>, CoreError> {
        let result = self
            .client()
            .update_property_info(id, input)
            .await
            .map_err(Into::into);
        self.saved(&self.inner.store.property_info, result, "updated")
    }

    pub async fn toggle_property_info(
        &self,
        id: &EntityId,
    ) -> Result<Arc<PropertyInfoItem>, CoreError> {
        self.toggle(&self.inner.store.property_info, id, |c, id, active| async move {
            c.toggle_property_info(&id, active).await
        })
        .await
    }

    pub async fn move_property_info(
        &self,
        id: &EntityId,
        movement: impl Into<Move>,
    ) -> Result<Vec<Arc<PropertyInfoItem>>, CoreError> {
        self.reorder(
            &self.inner.store.property_info,
            id,
            movement.into(),
            |c, _, entries| async move { c.reorder_property_info(&entries).await },
        )
        .await
    }

    pub async fn delete_property_info(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.property_info, id, |c, id| async move {
            c.delete_property_info(&id).await
        })
        .await
    }

    // ── Background images ────────────────────────────────────────────

    pub(crate) async fn fetch_backgrounds(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<BackgroundImage>>, CoreError> {
        let client = self.client();
        Self::refresh(&self.inner.store.backgrounds, scope, client.list_backgrounds(scope)).await
    }

    pub async fn list_backgrounds(
        &self,
        scope: Option<&EntityId>,
    ) -> Result<Vec<Arc<BackgroundImage>>, CoreError> {
        let result = self.fetch_backgrounds(scope).await;
        self.read(result)
    }

    /// Multipart upload of a local file, checked against the type
    /// allow-list and size ceiling first.
    pub async fn upload_background(
        &self,
        property_id: &EntityId,
        season: Option<&str>,
        path: &Path,
    ) -> Result<Arc<BackgroundImage>, CoreError> {
        let result: Result<BackgroundImage, CoreError> = async {
            image::check_file_type(path)?;
            let size = tokio::fs::metadata(path)
                .await
                .map_err(|e| CoreError::ValidationFailed {
                    message: format!("cannot read {}: {e}", path.display()),
                })?
                .len();
            image::check_file_size(path, size)?;
            let upload = ImageUpload::from_path(path).await?;
            Ok(self
                .client()
                .upload_background(property_id, season, upload)
                .await?)
        }
        .await;
        self.saved(&self.inner.store.backgrounds, result, "uploaded")
    }

    pub async fn delete_background(&self, id: &EntityId) -> Result<(), CoreError> {
        self.delete(&self.inner.store.backgrounds, id, |c, id| async move {
            c.delete_background(&id).await
        })
        .await
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Resolve a standalone image form (upload, URL check or import).
    pub async fn resolve_image(&self, form: &ImageForm) -> Result<Option<String>, CoreError> {
        let result = self.attach_image(form).await;
        self.read(result)
    }

    pub async fn check_image(&self, url: &str) -> Result<ImageCheck, CoreError> {
        let result: Result<ImageCheck, CoreError> = async {
            let url = image::check_url(url)?;
            Ok(self.client().check_image(url.as_str()).await?)
        }
        .await;
        self.read(result)
    }

    /// Download an external image through the backend proxy.
    pub async fn fetch_image(&self, url: &str) -> Result<ProxiedImage, CoreError> {
        let result = image::fetch(url, &self.client()).await;
        self.read(result)
    }

    pub async fn search_images(&self, query: &str) -> Result<Vec<ImageSearchResult>, CoreError> {
        let result = self.client().search_images(query).await.map_err(Into::into);
        self.read(result)
    }
}

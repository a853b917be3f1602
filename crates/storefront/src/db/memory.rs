//! In-process store backed by maps.
//!
//! Used for local development (`FITOVA_STORE=memory`) and as the store in
//! tests. Besides the repository traits it can:
//!
//! - record which operations it served, so tests can assert a lookup never
//!   happened
//! - fail chosen operations with [`RepositoryError::Unavailable`]
//! - be seeded with catalog, content and order rows directly

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use fitova_core::{
    AddressId, ContactMessageId, Email, HomepageSlideId, OrderId, OrderStatus, ProductId, UserId,
};

use super::{
    AddressRepo, CatalogRepo, ContactRepo, ContentRepo, IdentityRepo, OfferRepo, OrderRepo,
    ProfileRepo, RepositoryError, Store,
};
use crate::models::{
    Address, Category, ContactMessage, HomepageSlide, Identity, NewAddress, NewContactMessage,
    NewHomepageSlide, Offer, Product, ProductQuery, ProductRanking, Profile, ProfileChanges,
    Testimonial,
};

/// One store operation, as recorded and as a failure target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateIdentity,
    Credentials,
    Profile,
    UpdateProfile,
    CountProfiles,
    Addresses,
    InsertAddress,
    UpdateAddress,
    DeleteAddress,
    SetDefaultAddress,
    Categories,
    Products,
    ProductBySlug,
    ProductsByIds,
    RankProducts,
    RecentProducts,
    TopProducts,
    RecordClick,
    CountProducts,
    ActiveOffers,
    Testimonials,
    HomepageSlides,
    InsertHomepageSlide,
    InsertContactMessage,
    CountOrders,
    CompletedOrderTotals,
    HealthCheck,
}

#[derive(Debug, Clone)]
struct OrderRecord {
    status: OrderStatus,
    total_amount: Decimal,
}

#[derive(Debug, Default)]
struct Tables {
    credentials: HashMap<Email, (UserId, String)>,
    profiles: HashMap<UserId, Profile>,
    addresses: Vec<Address>,
    categories: Vec<Category>,
    products: Vec<Product>,
    rankings: HashMap<ProductRanking, Vec<ProductId>>,
    offers: Vec<Offer>,
    testimonials: Vec<Testimonial>,
    slides: Vec<HomepageSlide>,
    contact_messages: Vec<ContactMessage>,
    orders: HashMap<OrderId, OrderRecord>,
}

/// Map-backed [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    served: Mutex<Vec<Operation>>,
    failing: Mutex<HashSet<Operation>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `op` fail with `Unavailable`.
    pub fn fail(&self, op: Operation) {
        guard(&self.failing).insert(op);
    }

    /// Undo [`fail`](Self::fail).
    pub fn recover(&self, op: Operation) {
        guard(&self.failing).remove(&op);
    }

    /// How many times `op` has been called, including failed calls.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        guard(&self.served).iter().filter(|o| **o == op).count()
    }

    fn enter(&self, op: Operation) -> Result<(), RepositoryError> {
        guard(&self.served).push(op);
        if guard(&self.failing).contains(&op) {
            return Err(RepositoryError::Unavailable(format!("{op:?} is failing")));
        }
        Ok(())
    }

    /// Set the admin flag on an existing profile. Returns `false` when no
    /// profile exists for `user`.
    pub async fn set_admin(&self, user: UserId, is_admin: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.profiles.get_mut(&user) {
            Some(profile) => {
                profile.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    /// Remove a profile while keeping the identity, as when a profile row
    /// was never created for an account.
    pub async fn remove_profile(&self, user: UserId) {
        self.tables.write().await.profiles.remove(&user);
    }

    pub async fn seed_category(&self, category: Category) {
        self.tables.write().await.categories.push(category);
    }

    pub async fn seed_product(&self, product: Product) {
        self.tables.write().await.products.push(product);
    }

    pub async fn seed_offer(&self, offer: Offer) {
        self.tables.write().await.offers.push(offer);
    }

    pub async fn seed_testimonial(&self, testimonial: Testimonial) {
        self.tables.write().await.testimonials.push(testimonial);
    }

    pub async fn seed_slide(&self, slide: HomepageSlide) {
        self.tables.write().await.slides.push(slide);
    }

    pub async fn seed_order(&self, status: OrderStatus, total_amount: Decimal) -> OrderId {
        let id = OrderId::generate();
        self.tables.write().await.orders.insert(
            id,
            OrderRecord {
                status,
                total_amount,
            },
        );
        id
    }

    /// Fix the ids a ranking procedure returns, best first.
    pub async fn set_ranking(&self, ranking: ProductRanking, ids: Vec<ProductId>) {
        self.tables.write().await.rankings.insert(ranking, ids);
    }

    /// Every contact message received so far.
    pub async fn contact_messages(&self) -> Vec<ContactMessage> {
        self.tables.read().await.contact_messages.clone()
    }
}

fn limited<T>(rows: impl Iterator<Item = T>, limit: Option<i64>) -> Vec<T> {
    match limit.map(|l| usize::try_from(l).unwrap_or(0)) {
        Some(n) => rows.take(n).collect(),
        None => rows.collect(),
    }
}

fn newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl IdentityRepo for MemoryStore {
    async fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> Result<Identity, RepositoryError> {
        self.enter(Operation::CreateIdentity)?;
        let mut tables = self.tables.write().await;
        if tables.credentials.contains_key(email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::generate();
        let now = Utc::now();
        tables
            .credentials
            .insert(email.clone(), (id, password_hash.to_owned()));
        tables.profiles.insert(
            id,
            Profile {
                id,
                email: email.clone(),
                full_name: full_name.map(str::to_owned),
                phone: None,
                avatar_url: None,
                is_admin: false,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(Identity {
            id,
            email: email.clone(),
        })
    }

    async fn credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(Identity, String)>, RepositoryError> {
        self.enter(Operation::Credentials)?;
        let tables = self.tables.read().await;
        Ok(tables.credentials.get(email).map(|(id, hash)| {
            (
                Identity {
                    id: *id,
                    email: email.clone(),
                },
                hash.clone(),
            )
        }))
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, RepositoryError> {
        self.enter(Operation::Profile)?;
        Ok(self.tables.read().await.profiles.get(&user).cloned())
    }

    async fn update_profile(
        &self,
        user: UserId,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError> {
        self.enter(Operation::UpdateProfile)?;
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .get_mut(&user)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(full_name) = &changes.full_name {
            profile.full_name = Some(full_name.clone());
        }
        if let Some(phone) = &changes.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(avatar_url) = &changes.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        profile.updated_at = updated_at;

        Ok(profile.clone())
    }

    async fn count_profiles(&self) -> Result<i64, RepositoryError> {
        self.enter(Operation::CountProfiles)?;
        let count = self.tables.read().await.profiles.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

fn apply_address(target: &mut Address, address: &NewAddress, now: DateTime<Utc>) {
    target.label.clone_from(&address.label);
    target.full_name.clone_from(&address.full_name);
    target.phone.clone_from(&address.phone);
    target.line1.clone_from(&address.line1);
    target.line2.clone_from(&address.line2);
    target.city.clone_from(&address.city);
    target.state.clone_from(&address.state);
    target.postal_code.clone_from(&address.postal_code);
    target.country.clone_from(&address.country);
    target.is_default = address.is_default;
    target.updated_at = now;
}

fn clear_defaults(addresses: &mut [Address], owner: UserId, except: Option<AddressId>) {
    for address in addresses
        .iter_mut()
        .filter(|a| a.user_id == owner && a.is_default && Some(a.id) != except)
    {
        address.is_default = false;
    }
}

#[async_trait]
impl AddressRepo for MemoryStore {
    async fn addresses(&self, owner: UserId) -> Result<Vec<Address>, RepositoryError> {
        self.enter(Operation::Addresses)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Address> = tables
            .addresses
            .iter()
            .filter(|a| a.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn insert_address(
        &self,
        owner: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        self.enter(Operation::InsertAddress)?;
        let mut tables = self.tables.write().await;
        if address.is_default {
            clear_defaults(&mut tables.addresses, owner, None);
        }

        let now = Utc::now();
        let mut row = Address {
            id: AddressId::generate(),
            user_id: owner,
            label: None,
            full_name: String::new(),
            phone: None,
            line1: String::new(),
            line2: None,
            city: String::new(),
            state: None,
            postal_code: String::new(),
            country: String::new(),
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        apply_address(&mut row, address, now);
        tables.addresses.push(row.clone());
        Ok(row)
    }

    async fn update_address(
        &self,
        owner: UserId,
        id: AddressId,
        address: &NewAddress,
    ) -> Result<Option<Address>, RepositoryError> {
        self.enter(Operation::UpdateAddress)?;
        let mut tables = self.tables.write().await;
        if !tables
            .addresses
            .iter()
            .any(|a| a.id == id && a.user_id == owner)
        {
            return Ok(None);
        }

        if address.is_default {
            clear_defaults(&mut tables.addresses, owner, Some(id));
        }
        let now = Utc::now();
        let row = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|a| {
                apply_address(a, address, now);
                a.clone()
            });
        Ok(row)
    }

    async fn delete_address(&self, owner: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        self.enter(Operation::DeleteAddress)?;
        let mut tables = self.tables.write().await;
        let before = tables.addresses.len();
        tables
            .addresses
            .retain(|a| !(a.id == id && a.user_id == owner));
        Ok(tables.addresses.len() < before)
    }

    async fn set_default_address(
        &self,
        owner: UserId,
        id: AddressId,
    ) -> Result<bool, RepositoryError> {
        self.enter(Operation::SetDefaultAddress)?;
        let mut tables = self.tables.write().await;
        if !tables
            .addresses
            .iter()
            .any(|a| a.id == id && a.user_id == owner)
        {
            return Ok(false);
        }

        clear_defaults(&mut tables.addresses, owner, Some(id));
        let now = Utc::now();
        for address in tables
            .addresses
            .iter_mut()
            .filter(|a| a.id == id && a.user_id == owner)
        {
            address.is_default = true;
            address.updated_at = now;
        }
        Ok(true)
    }
}

#[async_trait]
impl CatalogRepo for MemoryStore {
    async fn categories(&self, active_only: bool) -> Result<Vec<Category>, RepositoryError> {
        self.enter(Operation::Categories)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.is_active || !active_only)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        self.enter(Operation::Products)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| query.category_id.is_none_or(|c| p.category_id == Some(c)))
            .filter(|p| p.is_featured || !query.featured_only)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(limited(rows.into_iter(), query.limit))
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        self.enter(Operation::ProductBySlug)?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.slug == slug && p.is_active)
            .cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        self.enter(Operation::ProductsByIds)?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.is_active && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn rank_products(
        &self,
        ranking: ProductRanking,
        limit: i64,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        self.enter(Operation::RankProducts)?;
        let tables = self.tables.read().await;
        if let Some(ids) = tables.rankings.get(&ranking) {
            return Ok(limited(ids.iter().copied(), Some(limit)));
        }

        // Without a fixed ranking, trending falls back to lifetime clicks.
        match ranking {
            ProductRanking::Trending => {
                let mut clicked: Vec<&Product> = tables
                    .products
                    .iter()
                    .filter(|p| p.is_active && p.click_count > 0)
                    .collect();
                clicked.sort_by(|a, b| b.click_count.cmp(&a.click_count));
                Ok(limited(clicked.into_iter().map(|p| p.id), Some(limit)))
            }
            ProductRanking::BestSellers => Ok(Vec::new()),
        }
    }

    async fn recent_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        self.enter(Operation::RecentProducts)?;
        let mut rows = self.tables.read().await.products.clone();
        newest_first(&mut rows);
        Ok(limited(rows.into_iter(), Some(limit)))
    }

    async fn top_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        self.enter(Operation::TopProducts)?;
        let mut rows = self.tables.read().await.products.clone();
        rows.sort_by(|a, b| {
            b.click_count
                .cmp(&a.click_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(limited(rows.into_iter(), Some(limit)))
    }

    async fn record_click(&self, id: ProductId) -> Result<Option<String>, RepositoryError> {
        self.enter(Operation::RecordClick)?;
        let mut tables = self.tables.write().await;
        Ok(tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.is_active)
            .map(|p| {
                p.click_count += 1;
                p.affiliate_url.clone()
            }))
    }

    async fn count_products(&self) -> Result<i64, RepositoryError> {
        self.enter(Operation::CountProducts)?;
        let count = self.tables.read().await.products.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl OfferRepo for MemoryStore {
    async fn active_offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        self.enter(Operation::ActiveOffers)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Offer> = tables.offers.iter().filter(|o| o.is_active).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl ContentRepo for MemoryStore {
    async fn testimonials(&self, limit: Option<i64>) -> Result<Vec<Testimonial>, RepositoryError> {
        self.enter(Operation::Testimonials)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Testimonial> = tables
            .testimonials
            .iter()
            .filter(|t| t.is_visible)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.sort_order);
        Ok(limited(rows.into_iter(), limit))
    }

    async fn homepage_slides(
        &self,
        active_only: bool,
    ) -> Result<Vec<HomepageSlide>, RepositoryError> {
        self.enter(Operation::HomepageSlides)?;
        let tables = self.tables.read().await;
        let mut rows: Vec<HomepageSlide> = tables
            .slides
            .iter()
            .filter(|s| s.is_active || !active_only)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.sort_order);
        Ok(rows)
    }

    async fn insert_homepage_slide(
        &self,
        slide: &NewHomepageSlide,
    ) -> Result<HomepageSlide, RepositoryError> {
        self.enter(Operation::InsertHomepageSlide)?;
        let now = Utc::now();
        let row = HomepageSlide {
            id: HomepageSlideId::generate(),
            title: slide.title.clone(),
            subtitle: slide.subtitle.clone(),
            description: slide.description.clone(),
            button_text: slide.button_text.clone(),
            button_link: slide.button_link.clone(),
            image_url: slide.image_url.clone(),
            sort_order: slide.sort_order,
            is_active: slide.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.slides.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ContactRepo for MemoryStore {
    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, RepositoryError> {
        self.enter(Operation::InsertContactMessage)?;
        let row = ContactMessage {
            id: ContactMessageId::generate(),
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.contact_messages.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn count_orders(&self) -> Result<i64, RepositoryError> {
        self.enter(Operation::CountOrders)?;
        let count = self.tables.read().await.orders.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn completed_order_totals(&self) -> Result<Vec<Decimal>, RepositoryError> {
        self.enter(Operation::CompletedOrderTotals)?;
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| o.total_amount)
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        self.enter(Operation::HealthCheck)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_address(city: &str, is_default: bool) -> NewAddress {
        NewAddress {
            label: None,
            full_name: "Nour Adel".to_owned(),
            phone: None,
            line1: "12 Nile St".to_owned(),
            line2: None,
            city: city.to_owned(),
            state: None,
            postal_code: "11511".to_owned(),
            country: "EG".to_owned(),
            is_default,
        }
    }

    #[tokio::test]
    async fn test_failing_operation_is_recorded_and_errors() {
        let store = MemoryStore::new();
        store.fail(Operation::Categories);

        let result = store.categories(true).await;

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
        assert_eq!(store.calls(Operation::Categories), 1);

        store.recover(Operation::Categories);
        assert!(store.categories(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let email = Email::parse("a@fitova.shop").unwrap();
        store.create_identity(&email, "hash", None).await.unwrap();

        let result = store.create_identity(&email, "hash", None).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_set_default_clears_previous_default() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let first = store
            .insert_address(owner, &new_address("Cairo", true))
            .await
            .unwrap();
        let second = store
            .insert_address(owner, &new_address("Giza", false))
            .await
            .unwrap();

        assert!(store.set_default_address(owner, second.id).await.unwrap());

        let rows = store.addresses(owner).await.unwrap();
        let defaults: Vec<AddressId> =
            rows.iter().filter(|a| a.is_default).map(|a| a.id).collect();
        assert_eq!(defaults, vec![second.id]);
        assert!(rows.iter().any(|a| a.id == first.id && !a.is_default));
    }

    #[tokio::test]
    async fn test_address_operations_are_scoped_by_owner() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let stranger = UserId::generate();
        let address = store
            .insert_address(owner, &new_address("Cairo", false))
            .await
            .unwrap();

        assert!(!store.set_default_address(stranger, address.id).await.unwrap());
        assert!(
            store
                .update_address(stranger, address.id, &new_address("Alex", false))
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_address(stranger, address.id).await.unwrap());
        assert_eq!(store.addresses(owner).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_default_inserts_leave_one_default() {
        let store = Arc::new(MemoryStore::new());
        let owner = UserId::generate();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_address(owner, &new_address(&format!("City {i}"), true))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let rows = store.addresses(owner).await.unwrap();
        assert_eq!(rows.len(), 16);
        assert_eq!(rows.iter().filter(|a| a.is_default).count(), 1);
    }

    #[tokio::test]
    async fn test_completed_order_totals_only_include_completed() {
        let store = MemoryStore::new();
        store
            .seed_order(OrderStatus::Completed, Decimal::new(1050, 2))
            .await;
        store
            .seed_order(OrderStatus::Pending, Decimal::new(999, 2))
            .await;

        let totals = store.completed_order_totals().await.unwrap();

        assert_eq!(totals, vec![Decimal::new(1050, 2)]);
        assert_eq!(store.count_orders().await.unwrap(), 2);
    }
}

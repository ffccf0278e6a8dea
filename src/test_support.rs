//! 测试用的内存实现，行为和 MySQL / redis 版本保持一致

use crate::db::cache::{CacheError, CacheTrait};
use crate::model::diet::{
    DailyCalories, DietEntry, DietEntryWrite, DietItemDetail, Food, MealType, NewDietItem,
    NewFood,
};
use crate::model::user::{
    ExerciseTotals, NewUser, ProfileUpdate, TokenRecord, User, VerificationCode, WorkoutPlan,
};
use crate::model::video::{NewVideo, PlayRecord, PlayRecordDetail, Video};
use crate::repository::diet_repository::DietRepositoryTrait;
use crate::repository::play_record_repository::PlayRecordRepositoryTrait;
use crate::repository::token_repository::TokenRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::repository::verification_code_repository::VerificationCodeRepositoryTrait;
use crate::repository::video_repository::VideoRepositoryTrait;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

fn paginate<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

fn duplicate_entry() -> sqlx::Error {
    sqlx::Error::Protocol("duplicate entry".to_string())
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn raw_set(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (value.to_string(), Instant::now() + Duration::from_secs(3600)),
        );
    }
}

#[async_trait]
impl CacheTrait for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (
                value.to_string(),
                Instant::now() + Duration::from_secs(ttl_seconds),
            ),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenRepository {
    records: Mutex<HashMap<i64, TokenRecord>>,
    next_id: Mutex<i64>,
}

impl MemoryTokenRepository {
    pub fn set_expires(&self, user_id: i64, expires: DateTime<Utc>) {
        if let Some(record) = self.records.lock().unwrap().get_mut(&user_id) {
            record.expires = expires;
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenRepositoryTrait for MemoryTokenRepository {
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, sqlx::Error> {
        let mut records = self.records.lock().unwrap();
        let previous = records.get(&user_id).map(|record| record.token.clone());
        let id = match records.get(&user_id) {
            Some(record) => record.id,
            None => {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                *next_id
            }
        };
        records.insert(
            user_id,
            TokenRecord {
                id,
                token: token.to_string(),
                user_id,
                expires,
                created_at: now,
            },
        );
        Ok(previous)
    }

    async fn find_token(&self, token: &str) -> Result<Option<TokenRecord>, sqlx::Error> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|record| record.token == token)
            .cloned())
    }

    async fn find_token_by_user(&self, user_id: i64) -> Result<Option<TokenRecord>, sqlx::Error> {
        Ok(self.records.lock().unwrap().get(&user_id).cloned())
    }

    async fn delete_tokens_by_user(&self, user_id: i64) -> Result<u64, sqlx::Error> {
        Ok(self.records.lock().unwrap().remove(&user_id).map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<BTreeMap<i64, User>>,
    workout_plans: Mutex<HashMap<i64, String>>,
}

impl MemoryUserRepository {
    pub fn insert_user(&self, user_id: i64, phone: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: user_id,
            phone: phone.to_string(),
            password: String::new(),
            name: None,
            gender: None,
            birthday: None,
            height: None,
            weight: None,
            bmi: None,
            avatar: None,
            permission_code: crate::model::user::ROLE_USER.to_string(),
            is_first_login: true,
            total_exercise_seconds: 0,
            today_exercise_seconds: 0,
            last_exercise_date: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user_id, user.clone());
        user
    }

    pub fn set_workout_plan(&self, user_id: i64, plan: &str) {
        self.workout_plans
            .lock()
            .unwrap()
            .insert(user_id, plan.to_string());
    }

    pub fn get(&self, user_id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryUserRepository {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        Ok(self.get(user_id))
    }

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.phone == phone)
            .cloned())
    }

    async fn create_user(
        &self,
        new_user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|user| user.phone == new_user.phone) {
            return Err(duplicate_entry());
        }
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let user = User {
            id,
            phone: new_user.phone.clone(),
            password: new_user.password_hash.clone(),
            name: Some(new_user.name.clone()),
            gender: None,
            birthday: None,
            height: None,
            weight: None,
            bmi: None,
            avatar: None,
            permission_code: new_user.permission_code.clone(),
            is_first_login: true,
            total_exercise_seconds: 0,
            today_exercise_seconds: 0,
            last_exercise_date: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_password(
        &self,
        user_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        Ok(match users.get_mut(&user_id) {
            Some(user) => {
                user.password = password_hash.to_string();
                user.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            user.name = Some(name.clone());
        }
        if let Some(gender) = &update.gender {
            user.gender = Some(gender.clone());
        }
        user.birthday = update.birthday.or(user.birthday);
        user.height = update.height.or(user.height);
        user.weight = update.weight.or(user.weight);
        user.bmi = update.bmi.or(user.bmi);
        if let Some(is_first_login) = update.is_first_login {
            user.is_first_login = is_first_login;
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn add_exercise_seconds(
        &self,
        user_id: i64,
        seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ExerciseTotals>, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&user_id).map(|user| {
            user.total_exercise_seconds += seconds;
            user.today_exercise_seconds += seconds;
            user.last_exercise_date = Some(now);
            ExerciseTotals {
                total_exercise_seconds: user.total_exercise_seconds,
                today_exercise_seconds: user.today_exercise_seconds,
            }
        }))
    }

    async fn reset_today_exercise_seconds(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        let mut affected = 0;
        for user in users.values_mut() {
            if user.today_exercise_seconds != 0 {
                user.today_exercise_seconds = 0;
                user.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn find_workout_plan(&self, user_id: i64) -> Result<Option<WorkoutPlan>, sqlx::Error> {
        let now = Utc::now();
        Ok(self
            .workout_plans
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|plan| WorkoutPlan {
                id: user_id,
                user_id,
                plan: plan.clone(),
                created_at: now,
                updated_at: now,
            }))
    }
}

#[derive(Default)]
pub struct MemoryVerificationCodeRepository {
    codes: Mutex<HashMap<String, VerificationCode>>,
}

impl MemoryVerificationCodeRepository {
    pub fn code_for(&self, phone: &str) -> Option<String> {
        self.codes
            .lock()
            .unwrap()
            .get(phone)
            .map(|code| code.code.clone())
    }

    pub fn expire(&self, phone: &str) {
        if let Some(code) = self.codes.lock().unwrap().get_mut(phone) {
            code.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

#[async_trait]
impl VerificationCodeRepositoryTrait for MemoryVerificationCodeRepository {
    async fn upsert_code(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut codes = self.codes.lock().unwrap();
        let id = codes.len() as i64 + 1;
        codes.insert(
            phone.to_string(),
            VerificationCode {
                id,
                phone: phone.to_string(),
                code: code.to_string(),
                expires_at,
                created_at: now,
            },
        );
        Ok(())
    }

    async fn find_code(&self, phone: &str) -> Result<Option<VerificationCode>, sqlx::Error> {
        Ok(self.codes.lock().unwrap().get(phone).cloned())
    }

    async fn delete_code(&self, id: i64) -> Result<(), sqlx::Error> {
        self.codes.lock().unwrap().retain(|_, code| code.id != id);
        Ok(())
    }
}

pub fn sample_video(video_id: i64, video_type: &str) -> Video {
    let now = Utc::now();
    Video {
        id: video_id,
        title: format!("video {video_id}"),
        description: None,
        video_type: video_type.to_string(),
        cover_image: format!("https://cdn.example.com/{video_id}.jpg"),
        video_url: format!("https://cdn.example.com/{video_id}.mp4"),
        duration: 600,
        like_count: 0,
        uploaded_at: now + chrono::Duration::seconds(video_id),
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemoryVideoRepository {
    videos: Mutex<BTreeMap<i64, Video>>,
    likes: Mutex<Vec<(i64, i64)>>,
    favorites: Mutex<Vec<(i64, i64)>>,
}

impl MemoryVideoRepository {
    pub fn with_videos(videos: Vec<Video>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.videos.lock().unwrap();
            for video in videos {
                map.insert(video.id, video);
            }
        }
        repo
    }

    pub fn videos(&self) -> Vec<Video> {
        self.videos.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl VideoRepositoryTrait for MemoryVideoRepository {
    async fn find_video(&self, video_id: i64) -> Result<Option<Video>, sqlx::Error> {
        Ok(self.videos.lock().unwrap().get(&video_id).cloned())
    }

    async fn list_videos(
        &self,
        video_type: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|video| video.video_type == video_type)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(paginate(videos, offset, limit))
    }

    async fn count_videos(&self, video_type: &str) -> Result<i64, sqlx::Error> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|video| video.video_type == video_type)
            .count() as i64)
    }

    async fn create_video(
        &self,
        new_video: &NewVideo,
        now: DateTime<Utc>,
    ) -> Result<Video, sqlx::Error> {
        let mut videos = self.videos.lock().unwrap();
        let id = videos.keys().next_back().copied().unwrap_or(0) + 1;
        let video = Video {
            id,
            title: new_video.title.clone(),
            description: new_video.description.clone(),
            video_type: new_video.video_type.clone(),
            cover_image: new_video.cover_image.clone(),
            video_url: new_video.video_url.clone(),
            duration: new_video.duration,
            like_count: 0,
            uploaded_at: now,
            updated_at: now,
        };
        videos.insert(id, video.clone());
        Ok(video)
    }

    async fn liked_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, vid)| *uid == user_id && video_ids.contains(vid))
            .map(|(_, vid)| *vid)
            .collect())
    }

    async fn favorite_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, vid)| *uid == user_id && video_ids.contains(vid))
            .map(|(_, vid)| *vid)
            .collect())
    }

    async fn insert_like(
        &self,
        user_id: i64,
        video_id: i64,
        _now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut likes = self.likes.lock().unwrap();
        if likes.contains(&(user_id, video_id)) {
            return Ok(false);
        }
        likes.push((user_id, video_id));
        if let Some(video) = self.videos.lock().unwrap().get_mut(&video_id) {
            video.like_count += 1;
        }
        Ok(true)
    }

    async fn delete_like(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error> {
        let mut likes = self.likes.lock().unwrap();
        let before = likes.len();
        likes.retain(|pair| *pair != (user_id, video_id));
        if likes.len() == before {
            return Ok(false);
        }
        if let Some(video) = self.videos.lock().unwrap().get_mut(&video_id) {
            video.like_count = (video.like_count - 1).max(0);
        }
        Ok(true)
    }

    async fn count_likes(&self, video_id: i64) -> Result<i64, sqlx::Error> {
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, vid)| *vid == video_id)
            .count() as i64)
    }

    async fn insert_favorite(
        &self,
        user_id: i64,
        video_id: i64,
        _now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut favorites = self.favorites.lock().unwrap();
        if favorites.contains(&(user_id, video_id)) {
            return Ok(false);
        }
        favorites.push((user_id, video_id));
        Ok(true)
    }

    async fn delete_favorite(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error> {
        let mut favorites = self.favorites.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|pair| *pair != (user_id, video_id));
        Ok(favorites.len() != before)
    }

    async fn list_favorite_videos(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let videos = self.videos.lock().unwrap();
        let favorites: Vec<Video> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, vid)| videos.get(vid).cloned())
            .collect();
        Ok(paginate(favorites, offset, limit))
    }

    async fn count_favorites(&self, user_id: i64) -> Result<i64, sqlx::Error> {
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryPlayRecordRepository {
    records: Mutex<Vec<PlayRecord>>,
    videos: HashMap<i64, Video>,
}

impl MemoryPlayRecordRepository {
    pub fn with_videos(videos: Vec<Video>) -> Self {
        Self {
            records: Mutex::default(),
            videos: videos.into_iter().map(|video| (video.id, video)).collect(),
        }
    }

    pub fn records(&self) -> Vec<PlayRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayRecordRepositoryTrait for MemoryPlayRecordRepository {
    async fn accumulate_play_record(
        &self,
        user_id: i64,
        video_id: i64,
        play_date: NaiveDate,
        watched_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<PlayRecord, sqlx::Error> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|record| {
            record.user_id == user_id && record.video_id == video_id && record.play_date == play_date
        }) {
            record.watched_time += watched_seconds;
            record.updated_at = now;
            return Ok(record.clone());
        }
        let record = PlayRecord {
            id: records.len() as i64 + 1,
            user_id,
            video_id,
            play_date,
            watched_time: watched_seconds,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlayRecordDetail>, sqlx::Error> {
        let details: Vec<PlayRecordDetail> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|record| record.user_id == user_id && record.play_date == play_date)
            .filter_map(|record| {
                self.videos.get(&record.video_id).map(|video| PlayRecordDetail {
                    id: record.id,
                    video_id: record.video_id,
                    play_date: record.play_date,
                    watched_time: record.watched_time,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                    video_title: video.title.clone(),
                    video_cover_image: video.cover_image.clone(),
                    video_type: video.video_type.clone(),
                })
            })
            .collect();
        Ok(paginate(details, offset, limit))
    }

    async fn count_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.user_id == user_id && record.play_date == play_date)
            .count() as i64)
    }
}

pub fn sample_food(food_id: i64, name: &str, category: &str, calories: f64) -> Food {
    let now = Utc::now();
    Food {
        id: food_id,
        name: name.to_string(),
        category: category.to_string(),
        unit: "100g".to_string(),
        calories,
        image: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemoryDietRepository {
    foods: Mutex<BTreeMap<i64, Food>>,
    entries: Mutex<Vec<DietEntry>>,
    items: Mutex<Vec<(i64, NewDietItem)>>,
}

impl MemoryDietRepository {
    pub fn with_foods(foods: Vec<Food>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.foods.lock().unwrap();
            for food in foods {
                map.insert(food.id, food);
            }
        }
        repo
    }

    pub fn entries(&self) -> Vec<DietEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// 直接写入一条记录，绕过 upsert 的计算
    pub fn insert_raw_entry(
        &self,
        user_id: i64,
        meal_type: &str,
        entry_date: NaiveDate,
        total_calories: i64,
    ) {
        let mut entries = self.entries.lock().unwrap();
        let id = entries.len() as i64 + 1;
        let now = Utc::now();
        entries.push(DietEntry {
            id,
            user_id,
            meal_type: meal_type.to_string(),
            entry_date,
            total_calories,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn items_of(&self, entry_id: i64) -> Vec<NewDietItem> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == entry_id)
            .map(|(_, item)| item.clone())
            .collect()
    }

    fn filtered_foods(&self, category: &Option<String>, search: &Option<String>) -> Vec<Food> {
        let mut foods: Vec<Food> = self
            .foods
            .lock()
            .unwrap()
            .values()
            .filter(|food| category.as_ref().map_or(true, |c| &food.category == c))
            .filter(|food| search.as_ref().map_or(true, |s| food.name.contains(s.as_str())))
            .cloned()
            .collect();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        foods
    }
}

#[async_trait]
impl DietRepositoryTrait for MemoryDietRepository {
    async fn find_foods_by_ids(&self, food_ids: &[i64]) -> Result<Vec<Food>, sqlx::Error> {
        let foods = self.foods.lock().unwrap();
        Ok(food_ids
            .iter()
            .filter_map(|id| foods.get(id).cloned())
            .collect())
    }

    async fn list_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Food>, sqlx::Error> {
        Ok(paginate(self.filtered_foods(&category, &search), offset, limit))
    }

    async fn count_foods(
        &self,
        category: Option<String>,
        search: Option<String>,
    ) -> Result<i64, sqlx::Error> {
        Ok(self.filtered_foods(&category, &search).len() as i64)
    }

    async fn all_foods(&self) -> Result<Vec<Food>, sqlx::Error> {
        let mut foods: Vec<Food> = self.foods.lock().unwrap().values().cloned().collect();
        foods.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(foods)
    }

    async fn create_food(
        &self,
        new_food: &NewFood,
        now: DateTime<Utc>,
    ) -> Result<Food, sqlx::Error> {
        let mut foods = self.foods.lock().unwrap();
        let id = foods.keys().next_back().copied().unwrap_or(0) + 1;
        let food = Food {
            id,
            name: new_food.name.clone(),
            category: new_food.category.clone(),
            unit: new_food.unit.clone(),
            calories: new_food.calories,
            image: new_food.image.clone(),
            created_at: now,
            updated_at: now,
        };
        foods.insert(id, food.clone());
        Ok(food)
    }

    async fn replace_diet_entry(
        &self,
        user_id: i64,
        meal_type: MealType,
        entry_date: NaiveDate,
        items: &[NewDietItem],
        total_calories: i64,
        now: DateTime<Utc>,
    ) -> Result<DietEntryWrite, sqlx::Error> {
        let mut entries = self.entries.lock().unwrap();
        let mut stored_items = self.items.lock().unwrap();
        let existing = entries.iter_mut().find(|entry| {
            entry.user_id == user_id
                && entry.meal_type == meal_type.as_str()
                && entry.entry_date == entry_date
        });
        let write = match existing {
            Some(entry) => {
                entry.total_calories = total_calories;
                entry.updated_at = now;
                DietEntryWrite {
                    entry_id: entry.id,
                    created: false,
                }
            }
            None => {
                let id = entries.len() as i64 + 1;
                entries.push(DietEntry {
                    id,
                    user_id,
                    meal_type: meal_type.as_str().to_string(),
                    entry_date,
                    total_calories,
                    created_at: now,
                    updated_at: now,
                });
                DietEntryWrite {
                    entry_id: id,
                    created: true,
                }
            }
        };
        stored_items.retain(|(entry_id, _)| *entry_id != write.entry_id);
        stored_items.extend(items.iter().map(|item| (write.entry_id, item.clone())));
        Ok(write)
    }

    async fn list_diet_entries(
        &self,
        user_id: i64,
        entry_date: NaiveDate,
    ) -> Result<Vec<DietEntry>, sqlx::Error> {
        let mut entries: Vec<DietEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.entry_date == entry_date)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| {
            MealType::ALL
                .iter()
                .position(|meal| meal.as_str() == entry.meal_type)
        });
        Ok(entries)
    }

    async fn list_diet_items(&self, entry_ids: &[i64]) -> Result<Vec<DietItemDetail>, sqlx::Error> {
        let foods = self.foods.lock().unwrap();
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, (entry_id, _))| entry_ids.contains(entry_id))
            .filter_map(|(index, (entry_id, item))| {
                foods.get(&item.food_id).map(|food| DietItemDetail {
                    id: index as i64 + 1,
                    diet_entry_id: *entry_id,
                    food_id: item.food_id,
                    quantity: item.quantity,
                    calories: item.calories,
                    food_name: food.name.clone(),
                    food_category: food.category.clone(),
                    food_unit: food.unit.clone(),
                    food_calories: food.calories,
                    food_image: food.image.clone(),
                })
            })
            .collect())
    }

    async fn daily_calories(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCalories>, sqlx::Error> {
        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for entry in self.entries.lock().unwrap().iter() {
            if entry.user_id == user_id && entry.entry_date >= start && entry.entry_date <= end {
                let total = per_day.entry(entry.entry_date).or_default();
                *total = total.saturating_add(entry.total_calories);
            }
        }
        Ok(per_day
            .into_iter()
            .map(|(entry_date, total_calories)| DailyCalories {
                entry_date,
                total_calories,
            })
            .collect())
    }
}

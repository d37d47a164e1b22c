//! Dashboards, leaderboards and participation statistics.
//!
//! Aggregates are computed in memory from the per-course response set, which stays small
//! for a single classroom.

use std::collections::{BTreeMap, HashMap};

use chrono::Timelike;
use entity::{activity::ActivityStatus, user::Role};
use sea_orm::{DatabaseConnection, DbErr};

use crate::{
    model::analytics::{
        ActivityAnalyticsDto, ActivityStatDto, AdminDashboardDto, AdminDashboardStatsDto,
        AnalyticsHistoryDto, CourseAnalyticsDto, CourseParticipationDto, DashboardDto,
        LeaderboardDto, LeaderboardEntryDto, StudentDashboardDto, StudentParticipationDto,
        StudentStatsDto, TeacherDashboardDto, TeacherStatsDto,
    },
    server::{
        data::{
            activity::ActivityRepository, analytics::AnalyticsRepository,
            course::CourseRepository, enrollment::EnrollmentRepository,
            response::ResponseRepository, user::UserRepository,
        },
        error::AppError,
        model::{
            activity::{Activity, ActivityFilter},
            response::Response,
            user::User,
        },
        service::access::{
            ensure_activity_creator, ensure_course_owner, ensure_course_viewer, load_activity,
            load_course,
        },
    },
};

/// Number of recent items shown on dashboards.
const RECENT_LIMIT: u64 = 5;

/// Leaderboard points awarded per submitted response.
const POINTS_PER_RESPONSE: f64 = 10.0;

pub struct AnalyticsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard matching the caller's role.
    pub async fn dashboard(&self, user: &User) -> Result<DashboardDto, AppError> {
        let dashboard = match user.role {
            Role::Teacher => DashboardDto::Teacher(self.teacher_dashboard(user).await?),
            Role::Student => DashboardDto::Student(self.student_dashboard(user).await?),
            Role::Admin => DashboardDto::Admin(self.admin_dashboard().await?),
        };

        Ok(dashboard)
    }

    async fn teacher_dashboard(&self, teacher: &User) -> Result<TeacherDashboardDto, DbErr> {
        let activities = ActivityRepository::new(self.db);
        let by_status = |status| ActivityFilter {
            creator_id: Some(teacher.id),
            status: Some(status),
            ..Default::default()
        };

        let stats = TeacherStatsDto {
            total_courses: CourseRepository::new(self.db).count(Some(teacher.id)).await?,
            total_activities: activities
                .count(ActivityFilter {
                    creator_id: Some(teacher.id),
                    ..Default::default()
                })
                .await?,
            active_activities: activities.count(by_status(ActivityStatus::Active)).await?,
            completed_activities: activities.count(by_status(ActivityStatus::Completed)).await?,
        };

        let recent = activities
            .list(
                ActivityFilter {
                    creator_id: Some(teacher.id),
                    ..Default::default()
                },
                Some(RECENT_LIMIT),
            )
            .await?;
        let recent_activities = activities
            .with_details(recent)
            .await?
            .into_iter()
            .map(Activity::into_dto)
            .collect();

        let mut course_participation = Vec::new();
        for course in CourseRepository::new(self.db).get_by_teacher(teacher.id).await? {
            let total_students = EnrollmentRepository::new(self.db)
                .count_students(course.id)
                .await?;
            let total_responses = self.course_responses(course.id).await?.1.len() as u64;

            course_participation.push(CourseParticipationDto {
                course_id: course.id,
                course_code: course.course_code,
                course_name: course.course_name,
                total_students,
                total_responses,
                participation_rate: ratio(total_responses, total_students).min(1.0),
            });
        }

        Ok(TeacherDashboardDto {
            stats,
            recent_activities,
            course_participation,
        })
    }

    async fn student_dashboard(&self, student: &User) -> Result<StudentDashboardDto, DbErr> {
        let responses = ResponseRepository::new(self.db);

        let stats = StudentStatsDto {
            total_courses: EnrollmentRepository::new(self.db)
                .get_course_ids(student.id)
                .await?
                .len() as u64,
            total_participations: responses.count(Some(student.id)).await?,
        };

        let recent = responses
            .get_recent_by_student(student.id, RECENT_LIMIT)
            .await?;
        let recent_responses = responses
            .with_details(recent)
            .await?
            .into_iter()
            .map(Response::into_dto)
            .collect();

        Ok(StudentDashboardDto {
            stats,
            recent_responses,
        })
    }

    async fn admin_dashboard(&self) -> Result<AdminDashboardDto, DbErr> {
        let users = UserRepository::new(self.db);

        let stats = AdminDashboardStatsDto {
            total_users: users.count(None).await?,
            total_courses: CourseRepository::new(self.db).count(None).await?,
            total_activities: ActivityRepository::new(self.db)
                .count(ActivityFilter::default())
                .await?,
            total_responses: ResponseRepository::new(self.db).count(None).await?,
        };

        let mut role_stats = BTreeMap::new();
        for role in [Role::Teacher, Role::Student, Role::Admin] {
            role_stats.insert(role.as_str().to_string(), users.count(Some(role)).await?);
        }

        let recent_users = users
            .get_recent(RECENT_LIMIT)
            .await?
            .into_iter()
            .map(User::into_dto)
            .collect();

        Ok(AdminDashboardDto {
            stats,
            role_stats,
            recent_users,
        })
    }

    /// Ranks a course's enrolled students by participation and score.
    ///
    /// `total_score` is ten points per response plus the mean of the student's scored
    /// responses. Both averages and totals are rounded to two decimals.
    ///
    /// # Returns
    /// - `Ok(LeaderboardDto)` - Entries sorted by `total_score` descending
    /// - `Err(AppError::AuthErr)` - Caller cannot view the course
    pub async fn leaderboard(
        &self,
        user: &User,
        course_id: i32,
    ) -> Result<LeaderboardDto, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_viewer(self.db, user, &course, true).await?;

        let students = EnrollmentRepository::new(self.db)
            .get_students(course.id)
            .await?;
        let (_, responses) = self.course_responses(course.id).await?;

        let mut per_student: HashMap<i32, Vec<&Response>> = HashMap::new();
        for response in &responses {
            per_student.entry(response.student_id).or_default().push(response);
        }

        let mut entries: Vec<LeaderboardEntryDto> = students
            .into_iter()
            .map(|student| {
                let own = per_student.get(&student.id).map(Vec::as_slice).unwrap_or_default();
                let participation_count = own.len() as u64;
                let avg_score = mean(own.iter().filter_map(|r| r.score));
                let total_score = participation_count as f64 * POINTS_PER_RESPONSE + avg_score;

                LeaderboardEntryDto {
                    rank: 0,
                    student_id: student.id,
                    student_name: student.full_name,
                    student_number: student.student_id,
                    participation_count,
                    avg_score: round2(avg_score),
                    total_score: round2(total_score),
                }
            })
            .collect();

        entries.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.rank = idx as u32 + 1;
        }

        Ok(LeaderboardDto {
            course_id: course.id,
            leaderboard: entries,
        })
    }

    /// Response statistics of one activity for its creator.
    ///
    /// Unscored responses count as zero in `avg_score`, matching how the time average
    /// treats missing durations.
    pub async fn activity_analytics(
        &self,
        teacher: &User,
        activity_id: i32,
    ) -> Result<ActivityAnalyticsDto, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let repo = ResponseRepository::new(self.db);
        let responses = repo.get_by_activity(activity.id).await?;
        let responses = repo.with_details(responses).await?;

        let total_responses = responses.len() as u64;
        let avg_score = mean(responses.iter().map(|r| r.score.unwrap_or(0.0)));
        let avg_time = mean(
            responses
                .iter()
                .map(|r| f64::from(r.time_spent_seconds.unwrap_or(0))),
        );

        let mut time_distribution = BTreeMap::new();
        let mut score_distribution = BTreeMap::new();
        for response in &responses {
            *time_distribution.entry(response.submitted_at.hour()).or_insert(0) += 1;
            if let Some(score) = response.score {
                *score_distribution.entry(score_bucket(score)).or_insert(0) += 1;
            }
        }

        let activity = ActivityRepository::new(self.db)
            .with_details(vec![activity])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Activity not found"))?;

        Ok(ActivityAnalyticsDto {
            activity: activity.into_dto(),
            total_responses,
            avg_score: round2(avg_score),
            avg_time: round2(avg_time),
            time_distribution,
            score_distribution,
            responses: responses.into_iter().map(Response::into_dto).collect(),
        })
    }

    /// Stored AI analysis snapshots of an activity, newest first.
    pub async fn analytics_history(
        &self,
        teacher: &User,
        activity_id: i32,
    ) -> Result<AnalyticsHistoryDto, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let snapshots = AnalyticsRepository::new(self.db)
            .get_by_activity(activity.id)
            .await?;

        Ok(AnalyticsHistoryDto {
            activity_id: activity.id,
            snapshots: snapshots.into_iter().map(|s| s.into_dto()).collect(),
        })
    }

    /// Per-activity and per-student participation of a course for its teacher.
    pub async fn course_analytics(
        &self,
        teacher: &User,
        course_id: i32,
    ) -> Result<CourseAnalyticsDto, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        let students = EnrollmentRepository::new(self.db)
            .get_students(course.id)
            .await?;
        let (activities, responses) = self.course_responses(course.id).await?;

        let total_students = students.len() as u64;
        let total_activities = activities.len() as u64;

        let mut per_activity: HashMap<i32, u64> = HashMap::new();
        let mut per_student: HashMap<i32, u64> = HashMap::new();
        for response in &responses {
            *per_activity.entry(response.activity_id).or_insert(0) += 1;
            *per_student.entry(response.student_id).or_insert(0) += 1;
        }

        let activity_stats = activities
            .into_iter()
            .map(|activity| {
                let response_count = per_activity.get(&activity.id).copied().unwrap_or(0);
                ActivityStatDto {
                    activity_id: activity.id,
                    title: activity.title,
                    activity_type: activity.activity_type,
                    status: activity.status,
                    response_count,
                    participation_rate: round2(ratio(response_count, total_students)),
                }
            })
            .collect();

        let student_participation = students
            .into_iter()
            .map(|student| {
                let participation_count = per_student.get(&student.id).copied().unwrap_or(0);
                StudentParticipationDto {
                    student_id: student.id,
                    student_name: student.full_name,
                    student_number: student.student_id,
                    participation_count,
                    participation_rate: round2(ratio(participation_count, total_activities)),
                }
            })
            .collect();

        let course = CourseRepository::new(self.db)
            .with_details(vec![course])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        Ok(CourseAnalyticsDto {
            course: course.into_dto(),
            total_students,
            total_activities,
            activity_stats,
            student_participation,
        })
    }

    /// Activities of a course and every response to them.
    async fn course_responses(
        &self,
        course_id: i32,
    ) -> Result<(Vec<Activity>, Vec<Response>), DbErr> {
        let activities = ActivityRepository::new(self.db)
            .list(
                ActivityFilter {
                    course_id: Some(course_id),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let ids: Vec<i32> = activities.iter().map(|a| a.id).collect();
        let responses = ResponseRepository::new(self.db)
            .get_by_activities(&ids)
            .await?;

        Ok((activities, responses))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole`, zero when `whole` is zero.
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Arithmetic mean, zero for no values.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Ten point bucket label such as `"80-89"`.
fn score_bucket(score: f64) -> String {
    let low = (score / 10.0).floor() as i64 * 10;
    format!("{}-{}", low, low + 9)
}

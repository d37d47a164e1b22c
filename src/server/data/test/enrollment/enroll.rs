use super::*;

/// Tests enrolling and unenrolling a student.
///
/// Expected: enrollment visible, then removed
#[tokio::test]
async fn enrolls_and_unenrolls() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::user::create_student(db).await?;

    let repo = EnrollmentRepository::new(db);
    repo.enroll(course.id, student.id).await?;

    assert!(repo.is_enrolled(course.id, student.id).await?);
    assert_eq!(repo.count_students(course.id).await?, 1);
    assert_eq!(repo.get_course_ids(student.id).await?, vec![course.id]);

    assert!(repo.unenroll(course.id, student.id).await?);
    assert!(!repo.is_enrolled(course.id, student.id).await?);
    assert!(!repo.unenroll(course.id, student.id).await?);

    Ok(())
}

/// Tests listing enrolled students in enrollment order.
///
/// Expected: students returned in the order they were enrolled
#[tokio::test]
async fn lists_students_in_enrollment_order() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
    let first = factory::helpers::create_enrolled_student(db, course.id).await?;
    let second = factory::helpers::create_enrolled_student(db, course.id).await?;

    let students = EnrollmentRepository::new(db).get_students(course.id).await?;
    let ids: Vec<i32> = students.iter().map(|s| s.id).collect();

    assert_eq!(ids, vec![first.id, second.id]);

    Ok(())
}

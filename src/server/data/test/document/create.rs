use super::*;

/// Tests recording an upload.
///
/// Expected: active document with zero downloads and resolved names
#[tokio::test]
async fn records_upload() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_document_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;

    let repo = DocumentRepository::new(db);
    let document = repo
        .create(CreateDocumentParams {
            course_id: course.id,
            uploader_id: teacher.id,
            filename: "week1.pdf".to_string(),
            stored_filename: "20251001_week1.pdf".to_string(),
            file_path: format!("course_{}/20251001_week1.pdf", course.id),
            file_size: 2048,
            file_type: "pdf".to_string(),
            title: None,
            description: None,
        })
        .await?;

    assert!(document.is_active);
    assert_eq!(document.download_count, 0);

    let detailed = repo.with_details(vec![document]).await?;
    assert_eq!(detailed[0].course_name.as_deref(), Some(course.course_name.as_str()));
    assert_eq!(detailed[0].uploader_name.as_deref(), Some(teacher.full_name.as_str()));

    Ok(())
}

/// Tests the download counter.
///
/// Expected: two downloads recorded
#[tokio::test]
async fn increments_download_count() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_document_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let document = factory::document::create_document(db, course.id, teacher.id).await?;

    let repo = DocumentRepository::new(db);
    repo.increment_download_count(document.id).await?;
    repo.increment_download_count(document.id).await?;

    let found = repo.find_by_id(document.id).await?.unwrap();
    assert_eq!(found.download_count, 2);

    Ok(())
}

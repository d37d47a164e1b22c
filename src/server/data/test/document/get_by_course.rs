use super::*;

/// Tests hiding deactivated documents.
///
/// Expected: one active document, two in total
#[tokio::test]
async fn hides_inactive_documents() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_document_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    factory::document::create_document(db, course.id, teacher.id).await?;
    let hidden = factory::document::create_document(db, course.id, teacher.id).await?;

    let repo = DocumentRepository::new(db);
    repo.update(UpdateDocumentParams {
        id: hidden.id,
        title: None,
        description: None,
        is_active: Some(false),
    })
    .await?;

    assert_eq!(repo.get_by_course(course.id, true).await?.len(), 1);
    assert_eq!(repo.get_by_course(course.id, false).await?.len(), 2);

    Ok(())
}

/// Tests selecting active documents by ID inside one course.
///
/// Expected: documents from other courses and inactive ones are excluded
#[tokio::test]
async fn selects_active_documents_by_id() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_document_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let other = factory::course::create_course(db, teacher.id).await?;

    let wanted = factory::document::create_document(db, course.id, teacher.id).await?;
    let inactive = factory::document::DocumentFactory::new(db, course.id, teacher.id)
        .is_active(false)
        .build()
        .await?;
    let foreign = factory::document::create_document(db, other.id, teacher.id).await?;

    let documents = DocumentRepository::new(db)
        .get_active_by_ids(course.id, &[wanted.id, inactive.id, foreign.id])
        .await?;

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, wanted.id);

    Ok(())
}

/// Tests collecting object keys for cleanup.
///
/// Expected: one path per document
#[tokio::test]
async fn lists_file_paths() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_document_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let document = factory::document::create_document(db, course.id, teacher.id).await?;

    let paths = DocumentRepository::new(db)
        .get_file_paths_by_course(course.id)
        .await?;

    assert_eq!(paths, vec![document.file_path]);

    Ok(())
}

mod entity_tests {
    use chrono::{Duration, NaiveTime, Utc};

    use crate::entity::prelude::*;
    use crate::error::ValidationError;
    use crate::ids::*;
    use crate::test_utils::{create_course, create_student, date, setup_test_db};
    use crate::tree;

    async fn insert_group(db: &DatabaseConnection, name: &str) -> SubjectGroupModel {
        SubjectGroupActiveModel {
            id: Set(SubjectGroupId::new()),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert subject group")
    }

    async fn insert_schedule(db: &DatabaseConnection, course_id: CourseId) -> ScheduleModel {
        ScheduleActiveModel {
            id: Set(ScheduleId::new()),
            name: Set("A".to_string()),
            course_id: Set(course_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert schedule")
    }

    async fn insert_activity(db: &DatabaseConnection, track_attendance: bool) -> ActivityModel {
        let start = Utc::now();
        ActivityActiveModel {
            id: Set(ActivityId::new()),
            subject: Set("Lesson".to_string()),
            track_attendance: Set(track_attendance),
            start: Set(start),
            end: Set(start + Duration::minutes(50)),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert activity")
    }

    #[tokio::test]
    async fn test_slug_stamped_on_insert() {
        let db = setup_test_db().await;

        let group = insert_group(&db, "Health and PE").await;
        assert_eq!(group.slug, "health-and-pe");

        let subject = SubjectActiveModel {
            id: Set(SubjectId::new()),
            ministry_code: Set("PE".to_string()),
            name: Set("Physical Education".to_string()),
            // Ignored on insert
            slug: Set("custom".to_string()),
            group_id: Set(group.id),
        }
        .insert(&db)
        .await
        .unwrap();
        assert_eq!(subject.slug, "physical-education");
    }

    #[tokio::test]
    async fn test_slug_change_ignored_on_update() {
        let db = setup_test_db().await;
        let group = insert_group(&db, "Languages").await;

        let mut active: SubjectGroupActiveModel = group.into();
        active.name = Set("Learning Languages".to_string());
        active.slug = Set("learning-languages".to_string());
        let updated = active.update(&db).await.unwrap();

        assert_eq!(updated.name, "Learning Languages");
        assert_eq!(updated.slug, "languages");
    }

    #[tokio::test]
    async fn test_subject_group_cascade_to_subjects() {
        let db = setup_test_db().await;
        let group = insert_group(&db, "Science").await;
        SubjectActiveModel {
            id: Set(SubjectId::new()),
            ministry_code: Set("BIO".to_string()),
            name: Set("Biology".to_string()),
            group_id: Set(group.id),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let subjects = group.find_related(Subject).all(&db).await.unwrap();
        assert_eq!(subjects.len(), 1);

        SubjectGroup::delete_by_id(group.id).exec(&db).await.unwrap();
        assert_eq!(Subject::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ministry_id_unique() {
        let db = setup_test_db().await;
        let first = create_student(&db, "Aroha", "Ngata", 42).await;
        let first = Student::find_by_id(first).one(&db).await.unwrap().unwrap();

        let person_id = PersonId::new();
        PersonActiveModel {
            id: Set(person_id),
            first_name: Set("Tama".to_string()),
            last_name: Set("Ngata".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        let duplicate = StudentActiveModel {
            id: Set(StudentId::new()),
            person_id: Set(person_id),
            ministry_id: Set(42),
            orrs: Set(Orrs::NonOrrs),
            funding_year_level: Set(9),
            student_type_id: Set(first.student_type_id),
            zoning_status_id: Set(first.zoning_status_id),
            tuition_fee: Set(None),
            fulltime_equivalent: Set(None),
            exchange_scheme_id: Set(None),
            boarding_status: Set(false),
            eligibility_criteria_id: Set(None),
            year_level: Set(9),
        };

        let error = Student::insert(duplicate).exec(&db).await.unwrap_err();
        assert!(matches!(
            error.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_person_removes_student() {
        let db = setup_test_db().await;
        let student_id = create_student(&db, "Hemi", "Walker", 7).await;
        let student = Student::find_by_id(student_id).one(&db).await.unwrap().unwrap();

        let person = student.find_related(Person).one(&db).await.unwrap().unwrap();
        assert_eq!(person.full_name(), "Hemi Walker");

        Person::delete_by_id(person.id).exec(&db).await.unwrap();
        assert!(Student::find_by_id(student_id).one(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrolment_hook_rejects_backwards_dates() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "10MAT").await;
        let schedule = insert_schedule(&db, course_id).await;
        let student_id = create_student(&db, "Ana", "Smith", 8).await;

        let result = EnrolmentActiveModel {
            id: Set(EnrolmentId::new()),
            student_id: Set(student_id),
            schedule_id: Set(schedule.id),
            start: Set(date(2026, 5, 1)),
            end: Set(Some(date(2026, 4, 1))),
        }
        .insert(&db)
        .await;

        match result {
            Err(DbErr::Custom(message)) => assert_eq!(message, ValidationError::DateRange.to_string()),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_enrolment_check_constraint() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "10MAT").await;
        let schedule = insert_schedule(&db, course_id).await;
        let student_id = create_student(&db, "Ana", "Smith", 9).await;

        // Entity::insert skips the hook so this reaches the table constraint
        let backwards = EnrolmentActiveModel {
            id: Set(EnrolmentId::new()),
            student_id: Set(student_id),
            schedule_id: Set(schedule.id),
            start: Set(date(2026, 5, 1)),
            end: Set(Some(date(2026, 4, 1))),
        };
        assert!(Enrolment::insert(backwards).exec(&db).await.is_err());

        let open_ended = EnrolmentActiveModel {
            id: Set(EnrolmentId::new()),
            student_id: Set(student_id),
            schedule_id: Set(schedule.id),
            start: Set(date(2026, 5, 1)),
            end: Set(None),
        };
        Enrolment::insert(open_ended).exec(&db).await.unwrap();

        let enrolment = Enrolment::find().one(&db).await.unwrap().unwrap();
        assert!(enrolment.is_active_on(date(2030, 1, 1)));
        assert!(!enrolment.is_active_on(date(2026, 4, 30)));
    }

    #[tokio::test]
    async fn test_activity_timestamps() {
        let db = setup_test_db().await;
        let activity = insert_activity(&db, true).await;
        assert_eq!(activity.created, activity.last_modified);

        let mut active: ActivityActiveModel = activity.clone().into();
        active.subject = Set("Double lesson".to_string());
        let updated = active.update(&db).await.unwrap();

        assert_eq!(updated.created, activity.created);
        assert!(updated.last_modified >= activity.last_modified);
    }

    #[tokio::test]
    async fn test_activity_rejects_end_before_start() {
        let db = setup_test_db().await;
        let start = Utc::now();

        let result = ActivityActiveModel {
            id: Set(ActivityId::new()),
            subject: Set("Backwards".to_string()),
            track_attendance: Set(true),
            start: Set(start),
            end: Set(start - Duration::minutes(1)),
            ..Default::default()
        }
        .insert(&db)
        .await;

        assert!(matches!(result, Err(DbErr::Custom(_))));
    }

    #[tokio::test]
    async fn test_schedule_activity_many_to_many() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "9SCI").await;
        let a = insert_schedule(&db, course_id).await;
        let b = insert_schedule(&db, course_id).await;
        let activity = insert_activity(&db, true).await;

        for schedule_id in [a.id, b.id] {
            ScheduleActivityActiveModel {
                schedule_id: Set(schedule_id),
                activity_id: Set(activity.id),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let schedules = activity.find_related(Schedule).all(&db).await.unwrap();
        assert_eq!(schedules.len(), 2);
        let activities = a.find_related(Activity).all(&db).await.unwrap();
        assert_eq!(activities, vec![activity.clone()]);

        // Deleting a schedule only removes its side of the link
        Schedule::delete_by_id(a.id).exec(&db).await.unwrap();
        assert_eq!(ScheduleActivity::find().count(&db).await.unwrap(), 1);
        assert!(Activity::find_by_id(activity.id).one(&db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_event_groups_many_to_many() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "13GEO").await;

        let event_type_id = EventTypeId::new();
        EventTypeActiveModel {
            id: Set(event_type_id),
            name: Set("Trip".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        let group = GroupActiveModel {
            id: Set(GroupId::new()),
            name: Set("Year 13".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        let event = EventActiveModel {
            id: Set(EventId::new()),
            title: Set("Glacier".to_string()),
            description: Set(String::new()),
            event_type_id: Set(event_type_id),
            course_id: Set(course_id),
            place_id: Set(None),
            date: Set(date(2026, 11, 1)),
            start_time: Set(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            duration: Set(None),
        }
        .insert(&db)
        .await
        .unwrap();

        EventGroupActiveModel {
            event_id: Set(event.id),
            group_id: Set(group.id),
        }
        .insert(&db)
        .await
        .unwrap();

        let events = group.find_related(Event).all(&db).await.unwrap();
        assert_eq!(events, vec![event.clone()]);
        let groups = event.find_related(Group).all(&db).await.unwrap();
        assert_eq!(groups, vec![group]);
    }

    #[tokio::test]
    async fn test_one_grade_per_student_and_assessment() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "12ENG").await;
        let student_id = create_student(&db, "Kiri", "Brown", 11).await;

        let assessment = AssessmentActiveModel {
            id: Set(AssessmentId::new()),
            name: Set(Some("Essay".to_string())),
            content_kind: Set(crate::content::ContentKind::Course),
            content_id: Set(course_id.into_uuid()),
        }
        .insert(&db)
        .await
        .unwrap();

        let grade = |id| GradeActiveModel {
            id: Set(id),
            assessment_id: Set(assessment.id),
            student_id: Set(student_id),
            score: Set(None),
        };

        Grade::insert(grade(GradeId::new())).exec(&db).await.unwrap();
        let error = Grade::insert(grade(GradeId::new())).exec(&db).await.unwrap_err();
        assert!(matches!(
            error.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_attendance_code_in_use_cannot_be_deleted() {
        let db = setup_test_db().await;
        let student_id = create_student(&db, "Rua", "Tane", 12).await;
        let activity = insert_activity(&db, true).await;

        AttendanceCodeActiveModel {
            code: Set("P".to_string()),
            in_class: Set(true),
            reason: Set("Present".to_string()),
            explanation: Set(String::new()),
            audit_code: Set("P".to_string()),
            truancy_code: Set("P".to_string()),
            half_day_calc: Set(true),
        }
        .insert(&db)
        .await
        .unwrap();

        AttendanceActiveModel {
            id: Set(AttendanceId::new()),
            activity_id: Set(activity.id),
            student_id: Set(student_id),
            code: Set("P".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        assert!(AttendanceCode::delete_by_id("P".to_string()).exec(&db).await.is_err());

        // Deleting the activity takes its marks with it
        Activity::delete_by_id(activity.id).exec(&db).await.unwrap();
        assert_eq!(Attendance::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_parent_cascade() {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "11BIO").await;

        let root_id = PageId::new();
        let root_path = tree::root_path(root_id);
        let child_id = PageId::new();
        let child_path = tree::child_path(&root_path, child_id);

        for (id, parent_id, path) in [
            (root_id, None, root_path.clone()),
            (child_id, Some(root_id), child_path),
        ] {
            PageActiveModel {
                id: Set(id),
                course_id: Set(course_id),
                parent_id: Set(parent_id),
                name: Set("Cells".to_string()),
                content: Set(String::new()),
                content_kind: Set(None),
                content_id: Set(None),
                depth: Set(tree::depth(&path)),
                path: Set(path),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let child = Page::find_by_id(child_id).one(&db).await.unwrap().unwrap();
        assert_eq!(child.depth, 1);
        assert!(!child.is_root());

        Page::delete_by_id(root_id).exec(&db).await.unwrap();
        assert_eq!(Page::find().count(&db).await.unwrap(), 0);
    }
}

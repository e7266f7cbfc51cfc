use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventType::Table)
                    .col(pk_uuid(EventType::Id))
                    .col(string_len(EventType::Name, 32))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .col(pk_uuid(Event::Id))
                    .col(string_len(Event::Title, 128))
                    .col(text(Event::Description))
                    .col(uuid(Event::EventTypeId))
                    .col(uuid(Event::CourseId))
                    .col(uuid_null(Event::PlaceId))
                    .col(date(Event::Date))
                    .col(time(Event::StartTime))
                    .col(integer_null(Event::Duration))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_event_type_id")
                            .from(Event::Table, Event::EventTypeId)
                            .to(EventType::Table, EventType::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_course_id")
                            .from(Event::Table, Event::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_place_id")
                            .from(Event::Table, Event::PlaceId)
                            .to(Place::Table, Place::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_course_id")
                    .table(Event::Table)
                    .col(Event::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventGroup::Table)
                    .col(uuid(EventGroup::EventId))
                    .col(uuid(EventGroup::GroupId))
                    .primary_key(
                        Index::create()
                            .col(EventGroup::EventId)
                            .col(EventGroup::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_group_event_id")
                            .from(EventGroup::Table, EventGroup::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_group_group_id")
                            .from(EventGroup::Table, EventGroup::GroupId)
                            .to(AuthGroup::Table, AuthGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventGroup::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventType::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EventType {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    Id,
    Title,
    Description,
    EventTypeId,
    CourseId,
    PlaceId,
    Date,
    StartTime,
    Duration,
}

#[derive(DeriveIden)]
pub enum EventGroup {
    Table,
    EventId,
    GroupId,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Place {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AuthGroup {
    Table,
    Id,
}

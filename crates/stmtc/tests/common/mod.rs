//! Shared fixtures: employees with a phone, a department and projects.

#![allow(dead_code)]

use stmtc::{
    CascadeType, Catalog, EntityDef, EntityObject, FieldDef, JoinTable, RelationDef,
    SchemaBundle, Statement,
};

pub fn schema() -> SchemaBundle {
    let employee = EntityDef::new("Employee")
        .with_table("EMPLOYEE")
        .with_field(FieldDef::id("id").with_column("EMPLOYEE_ID"))
        .with_field(FieldDef::new("name").with_column("NAME"))
        .with_field(FieldDef::new("salary").with_column("SALARY"))
        .with_field(
            FieldDef::relation(
                "phone",
                RelationDef::one_to_one("Phone").with_cascade([CascadeType::All]),
            )
            .with_column("PHONE_ID"),
        )
        .with_field(
            FieldDef::relation("department", RelationDef::many_to_one("Department"))
                .with_column("DEPARTMENT_ID"),
        )
        .with_field(FieldDef::relation(
            "projects",
            RelationDef::many_to_many(
                "Project",
                JoinTable::new("EMPLOYEE_PROJECT", "EMPLOYEE_ID", "PROJECT_ID"),
            ),
        ));

    let phone = EntityDef::new("Phone")
        .with_table("PHONE")
        .with_field(FieldDef::id("id").with_column("PHONE_ID"))
        .with_field(FieldDef::new("number").with_column("NUMBER"))
        .with_field(FieldDef::relation(
            "owner",
            RelationDef::one_to_one("Employee").mapped_by("phone"),
        ));

    let project = EntityDef::new("Project")
        .with_table("PROJECT")
        .with_field(FieldDef::id("id").with_column("PROJECT_ID"))
        .with_field(FieldDef::new("title").with_column("TITLE"))
        .with_field(FieldDef::relation(
            "members",
            RelationDef::many_to_many_inverse("Employee", "projects"),
        ));

    let department = EntityDef::new("Department")
        .with_table("DEPARTMENT")
        .with_field(FieldDef::id("id").with_column("DEPT_ID"))
        .with_field(FieldDef::new("name").with_column("DEPT_NAME"))
        .with_field(FieldDef::relation(
            "employees",
            RelationDef::one_to_many("Employee").mapped_by("department"),
        ));

    let skill = EntityDef::new("Skill")
        .with_table("SKILL")
        .with_field(FieldDef::new("name").with_column("SKILL_NAME"))
        .with_field(FieldDef::id("code").with_column("SKILL_CODE"))
        .with_field(FieldDef::new("level").with_column("SKILL_LEVEL"));

    SchemaBundle::new(1)
        .with_entity(employee)
        .with_entity(phone)
        .with_entity(project)
        .with_entity(department)
        .with_entity(skill)
}

pub fn catalog() -> Catalog {
    Catalog::new(schema()).unwrap()
}

pub fn phone() -> EntityObject {
    EntityObject::new("Phone")
        .with("id", 1i64)
        .with("number", "555-0100")
}

pub fn project(id: &str, title: &str) -> EntityObject {
    EntityObject::new("Project").with("id", id).with("title", title)
}

pub fn department() -> EntityObject {
    EntityObject::new("Department")
        .with("id", "D1")
        .with("name", "Research")
}

/// Alice, with a phone, a department and two projects.
pub fn alice() -> EntityObject {
    EntityObject::new("Employee")
        .with("id", "E1")
        .with("name", "Alice")
        .with("salary", 5000i64)
        .with_one("phone", phone())
        .with_one("department", department())
        .with_many(
            "projects",
            vec![project("P1", "Apollo"), project("P2", "Gemini")],
        )
}

pub fn render(statements: &[Statement]) -> Vec<String> {
    statements.iter().map(ToString::to_string).collect()
}

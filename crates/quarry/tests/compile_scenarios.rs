//! End-to-end compilation scenarios across the three dialects.

use quarry::{
    Builder, ConditionGroup, Dialect, Grammar, JoinClause, Operand, Predicate, UpsertUpdate, Value,
};

fn all_dialects() -> [Grammar; 3] {
    [
        Grammar::new(Dialect::MySql),
        Grammar::new(Dialect::Postgres),
        Grammar::new(Dialect::Sqlite),
    ]
}

// ==================== Prefixing ====================

#[test]
fn prefixed_tables_are_never_double_prefixed() {
    let grammar = Grammar::with_table_prefix(Dialect::MySql, "wp_");
    let compiled = Builder::table("wp_posts")
        .join(
            "wp_term_relationships",
            "wp_posts.id",
            "=",
            "wp_term_relationships.object_id",
        )
        .filter("wp_term_relationships.term_id", "=", 5)
        .to_sql(&grammar)
        .unwrap();

    assert!(!compiled.sql.contains("wp_wp_"), "sql was: {}", compiled.sql);
    assert_eq!(
        compiled.sql,
        "select * from `wp_posts` \
         inner join `wp_term_relationships` on `wp_posts`.`id` = `wp_term_relationships`.`object_id` \
         where `wp_term_relationships`.`term_id` = ?"
    );
    assert_eq!(compiled.bindings, vec![Value::Int(5)]);
}

#[test]
fn unprefixed_tables_gain_the_prefix_everywhere() {
    let grammar = Grammar::with_table_prefix(Dialect::Postgres, "wp_");
    let compiled = Builder::table("posts")
        .join("comments", "posts.id", "=", "comments.post_id")
        .filter("comments.approved", "=", true)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from \"wp_posts\" \
         inner join \"wp_comments\" on \"wp_posts\".\"id\" = \"wp_comments\".\"post_id\" \
         where \"wp_comments\".\"approved\" = ?"
    );
}

#[test]
fn aliases_are_quoted_but_never_prefixed() {
    let grammar = Grammar::with_table_prefix(Dialect::Postgres, "wp_");
    let compiled = Builder::table("posts as p")
        .columns(&["p.title"])
        .filter("p.status", "=", "published")
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select \"p\".\"title\" from \"wp_posts\" as \"p\" where \"p\".\"status\" = ?"
    );
    assert!(!compiled.sql.contains("wp_p"));
}

// ==================== Predicate grouping ====================

#[test]
fn nested_group_scenario_is_byte_exact() {
    let grammar = Grammar::new(Dialect::Postgres);
    let compiled = Builder::table("posts")
        .filter_group(|g| g.filter("a", "=", 1).or_filter("b", "=", 2))
        .filter("c", "=", 3)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from \"posts\" where (\"a\" = ? or \"b\" = ?) and \"c\" = ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn empty_group_compiles_byte_identically_to_its_absence() {
    let grammar = Grammar::new(Dialect::Postgres);
    let plain = Builder::table("users").filter("a", "=", 1).to_sql(&grammar).unwrap();
    let with_empty = Builder::table("users")
        .filter("a", "=", 1)
        .filter_group(|g| g)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(plain, with_empty);
}

#[test]
fn deeply_nested_groups() {
    let grammar = Grammar::new(Dialect::Postgres);
    let compiled = Builder::table("t")
        .filter_group(|g| {
            g.filter("a", "=", 1)
                .or_filter_group(|inner| inner.filter("b", "=", 2).filter("c", "=", 3))
        })
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from \"t\" where (\"a\" = ? or (\"b\" = ? and \"c\" = ?))"
    );
    assert_eq!(
        compiled.bindings,
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn empty_in_list_is_always_false_but_valid() {
    let grammar = Grammar::new(Dialect::Postgres);
    let compiled = Builder::table("users")
        .filter_in("id", vec![])
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(compiled.sql, "select * from \"users\" where 0 = 1");
    assert!(compiled.bindings.is_empty());
    assert!(!compiled.sql.contains("in ()"));
}

// ==================== Binding order ====================

#[test]
fn bindings_follow_placeholder_order_across_clauses() {
    let grammar = Grammar::new(Dialect::Postgres);
    let on = ConditionGroup::new()
        .and(Predicate::comparison(
            "contacts.user_id",
            "=",
            Operand::column("users.id"),
        ))
        .and(Predicate::comparison("contacts.kind", "=", "primary"));

    let compiled = Builder::table("users")
        .columns(&["users.id"])
        .join_clause(JoinClause::inner("contacts", on))
        .filter("users.active", "=", true)
        .group_by(&["users.id"])
        .having("users.id", ">", 100)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select \"users\".\"id\" from \"users\" \
         inner join \"contacts\" on \"contacts\".\"user_id\" = \"users\".\"id\" and \"contacts\".\"kind\" = ? \
         where \"users\".\"active\" = ? \
         group by \"users\".\"id\" \
         having \"users\".\"id\" > ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![
            Value::Text("primary".to_string()),
            Value::Bool(true),
            Value::Int(100),
        ]
    );

    let placeholders = compiled.sql.matches('?').count();
    assert_eq!(placeholders, compiled.bindings.len());
}

#[test]
fn subquery_bindings_splice_in_position() {
    let grammar = Grammar::new(Dialect::Postgres);
    let banned = Builder::table("banned").columns(&["user_id"]).filter("kind", "=", "hard");
    let compiled = Builder::table("users")
        .filter("active", "=", true)
        .filter_in_sub("id", banned)
        .filter("age", ">", 21)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from \"users\" where \"active\" = ? \
         and \"id\" in (select \"user_id\" from \"banned\" where \"kind\" = ?) \
         and \"age\" > ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![
            Value::Bool(true),
            Value::Text("hard".to_string()),
            Value::Int(21),
        ]
    );
}

#[test]
fn update_set_bindings_precede_where_bindings() {
    let grammar = Grammar::new(Dialect::MySql);
    let compiled = Builder::table("users")
        .filter("id", "=", 9)
        .to_update_sql(
            &grammar,
            &[
                ("name".to_string(), Operand::from("N")),
                ("email".to_string(), Operand::from("e@example.com")),
            ],
        )
        .unwrap();

    assert_eq!(
        compiled.sql,
        "update `users` set `name` = ?, `email` = ? where `id` = ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![
            Value::Text("N".to_string()),
            Value::Text("e@example.com".to_string()),
            Value::Int(9),
        ]
    );
}

#[test]
fn update_with_join_keeps_emission_order() {
    let grammar = Grammar::new(Dialect::MySql);
    let on = ConditionGroup::new()
        .and(Predicate::comparison(
            "orders.user_id",
            "=",
            Operand::column("users.id"),
        ))
        .and(Predicate::comparison("orders.paid", "=", true));

    let compiled = Builder::table("users")
        .join_clause(JoinClause::inner("orders", on))
        .filter("users.id", "=", 1)
        .to_update_sql(&grammar, &[("users.vip".to_string(), Operand::from(true))])
        .unwrap();

    assert_eq!(
        compiled.sql,
        "update `users` inner join `orders` on `orders`.`user_id` = `users`.`id` and `orders`.`paid` = ? \
         set `users`.`vip` = ? where `users`.`id` = ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![Value::Bool(true), Value::Bool(true), Value::Int(1)]
    );
}

// ==================== Dialect parity ====================

#[test]
fn shared_surface_differs_only_in_quote_char() {
    let query = || {
        Builder::table("users")
            .columns(&["id", "name"])
            .filter("active", "=", true)
            .order_by("name")
            .limit(25)
            .offset(50)
    };

    let [mysql, postgres, sqlite] = all_dialects();
    let m = query().to_sql(&mysql).unwrap();
    let p = query().to_sql(&postgres).unwrap();
    let s = query().to_sql(&sqlite).unwrap();

    assert_eq!(p, s);
    assert_eq!(m.sql.replace('`', "\""), p.sql);
    assert_eq!(m.bindings, p.bindings);
    assert_eq!(
        p.sql,
        "select \"id\", \"name\" from \"users\" where \"active\" = ? \
         order by \"name\" asc limit 25 offset 50"
    );
}

#[test]
fn union_surface_is_shared() {
    let compiled = Builder::table("users")
        .columns(&["name"])
        .union_all(Builder::table("admins").columns(&["name"]))
        .to_sql(&Grammar::new(Dialect::Sqlite))
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select \"name\" from \"users\" union all select \"name\" from \"admins\""
    );
}

// ==================== Statement forms ====================

#[test]
fn exists_wraps_the_select() {
    let grammar = Grammar::new(Dialect::Postgres);
    let compiled = Builder::table("users")
        .filter("email", "=", "a@example.com")
        .to_exists_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select exists(select * from \"users\" where \"email\" = ?) as \"exists\""
    );
    assert_eq!(compiled.bindings, vec![Value::Text("a@example.com".to_string())]);
}

#[test]
fn insert_forms_per_dialect() {
    let rows = vec![vec![
        ("email".to_string(), Operand::from("a@example.com")),
        ("votes".to_string(), Operand::from(0)),
    ]];

    let mysql = Builder::table("users")
        .to_insert_sql(&Grammar::new(Dialect::MySql), &rows)
        .unwrap();
    assert_eq!(
        mysql.sql,
        "insert into `users` (`email`, `votes`) values (?, ?)"
    );

    let empty_pg = Builder::table("users")
        .to_insert_sql(&Grammar::new(Dialect::Postgres), &[])
        .unwrap();
    assert_eq!(empty_pg.sql, "insert into \"users\" default values");

    let empty_mysql = Builder::table("users")
        .to_insert_sql(&Grammar::new(Dialect::MySql), &[])
        .unwrap();
    assert_eq!(empty_mysql.sql, "insert into `users` () values ()");
}

#[test]
fn insert_or_ignore_forms_per_dialect() {
    let rows = vec![vec![("email".to_string(), Operand::from("a@example.com"))]];

    let mysql = Builder::table("users")
        .to_insert_or_ignore_sql(&Grammar::new(Dialect::MySql), &rows)
        .unwrap();
    assert_eq!(mysql.sql, "insert ignore into `users` (`email`) values (?)");

    let pg = Builder::table("users")
        .to_insert_or_ignore_sql(&Grammar::new(Dialect::Postgres), &rows)
        .unwrap();
    assert_eq!(
        pg.sql,
        "insert into \"users\" (\"email\") values (?) on conflict do nothing"
    );

    let sqlite = Builder::table("users")
        .to_insert_or_ignore_sql(&Grammar::new(Dialect::Sqlite), &rows)
        .unwrap();
    assert_eq!(
        sqlite.sql,
        "insert or ignore into \"users\" (\"email\") values (?)"
    );
}

#[test]
fn upsert_forms_per_dialect() {
    let rows = vec![vec![
        ("departure".to_string(), Operand::from("Oakland")),
        ("destination".to_string(), Operand::from("San Diego")),
        ("price".to_string(), Operand::from(99)),
    ]];
    let unique_by = vec!["departure".to_string(), "destination".to_string()];
    let update = UpsertUpdate::Columns(vec!["price".to_string()]);

    let mysql = Builder::table("flights")
        .to_upsert_sql(&Grammar::new(Dialect::MySql), &rows, &unique_by, &update)
        .unwrap();
    assert_eq!(
        mysql.sql,
        "insert into `flights` (`departure`, `destination`, `price`) values (?, ?, ?) \
         on duplicate key update `price` = values(`price`)"
    );

    let pg = Builder::table("flights")
        .to_upsert_sql(&Grammar::new(Dialect::Postgres), &rows, &unique_by, &update)
        .unwrap();
    assert_eq!(
        pg.sql,
        "insert into \"flights\" (\"departure\", \"destination\", \"price\") values (?, ?, ?) \
         on conflict (\"departure\", \"destination\") do update set \"price\" = \"excluded\".\"price\""
    );

    let sqlite = Builder::table("flights")
        .to_upsert_sql(&Grammar::new(Dialect::Sqlite), &rows, &unique_by, &update)
        .unwrap();
    assert_eq!(
        sqlite.sql,
        "insert into \"flights\" (\"departure\", \"destination\", \"price\") values (?, ?, ?) \
         on conflict (\"departure\", \"destination\") do update set \"price\" = \"excluded\".\"price\""
    );
}

#[test]
fn truncate_forms_per_dialect() {
    let builder = Builder::table("posts");

    let mysql = builder.to_truncate_sql(&Grammar::with_table_prefix(Dialect::MySql, "wp_")).unwrap();
    assert_eq!(mysql.len(), 1);
    assert_eq!(mysql[0].sql, "truncate table `wp_posts`");

    let pg = builder.to_truncate_sql(&Grammar::new(Dialect::Postgres)).unwrap();
    assert_eq!(pg.len(), 1);
    assert_eq!(pg[0].sql, "truncate \"posts\" restart identity cascade");

    let sqlite = builder
        .to_truncate_sql(&Grammar::with_table_prefix(Dialect::Sqlite, "wp_"))
        .unwrap();
    assert_eq!(sqlite.len(), 2);
    assert_eq!(sqlite[0].sql, "delete from sqlite_sequence where name = ?");
    assert_eq!(sqlite[0].bindings, vec![Value::Text("wp_posts".to_string())]);
    assert_eq!(sqlite[1].sql, "delete from \"wp_posts\"");
}

#[test]
fn delete_with_filters() {
    let compiled = Builder::table("users")
        .filter("votes", "<", 10)
        .to_delete_sql(&Grammar::new(Dialect::Sqlite))
        .unwrap();
    assert_eq!(compiled.sql, "delete from \"users\" where \"votes\" < ?");
    assert_eq!(compiled.bindings, vec![Value::Int(10)]);
}

// ==================== Locks ====================

#[test]
fn lock_requests_are_dialect_specific_and_noop_on_sqlite() {
    let query = || Builder::table("users").filter("id", "=", 1).lock_for_update();

    assert_eq!(
        query().to_sql(&Grammar::new(Dialect::MySql)).unwrap().sql,
        "select * from `users` where `id` = ? for update"
    );
    assert_eq!(
        query().to_sql(&Grammar::new(Dialect::Postgres)).unwrap().sql,
        "select * from \"users\" where \"id\" = ? for update"
    );
    assert_eq!(
        query().to_sql(&Grammar::new(Dialect::Sqlite)).unwrap().sql,
        "select * from \"users\" where \"id\" = ?"
    );
}

// ==================== Clone-for-variation ====================

#[test]
fn cloned_builders_never_share_predicate_state() {
    let grammar = Grammar::new(Dialect::Postgres);
    let base = Builder::table("orders")
        .filter_group(|g| g.filter("status", "=", "open").or_filter("status", "=", "held"));

    let narrowed = base.clone().filter("total", ">", 100);
    let widened = base.clone().or_filter("legacy", "=", true);

    let base_compiled = base.to_sql(&grammar).unwrap();
    assert_eq!(
        base_compiled.sql,
        "select * from \"orders\" where (\"status\" = ? or \"status\" = ?)"
    );
    assert_eq!(base_compiled.bindings.len(), 2);

    assert_eq!(narrowed.to_sql(&grammar).unwrap().bindings.len(), 3);
    assert_eq!(widened.to_sql(&grammar).unwrap().bindings.len(), 3);

    // The base is untouched by either variant.
    assert_eq!(base.to_sql(&grammar).unwrap(), base_compiled);
}

// ==================== Sub-query sources ====================

#[test]
fn from_subquery_and_scalar_select() {
    let grammar = Grammar::new(Dialect::Postgres);
    let recent = Builder::table("events").filter("kind", "=", "click").limit(100);
    let compiled = Builder::from_subquery(recent, "recent")
        .filter("recent.user_id", ">", 0)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from (select * from \"events\" where \"kind\" = ? limit 100) as \"recent\" \
         where \"recent\".\"user_id\" > ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![Value::Text("click".to_string()), Value::Int(0)]
    );
}

#[test]
fn exists_filter_in_where() {
    let grammar = Grammar::new(Dialect::Postgres);
    let orders = Builder::table("orders").filter_raw("orders.user_id = users.id", vec![]);
    let compiled = Builder::table("users")
        .filter_exists(orders)
        .to_sql(&grammar)
        .unwrap();

    assert_eq!(
        compiled.sql,
        "select * from \"users\" where exists (select * from \"orders\" where orders.user_id = users.id)"
    );
}

// ==================== Errors ====================

#[test]
fn unsupported_operator_names_dialect_and_operator() {
    let err = Builder::table("users")
        .filter("name", "~*", "pattern")
        .to_sql(&Grammar::new(Dialect::Sqlite))
        .unwrap_err();

    assert!(err.is_unsupported_operator());
    assert_eq!(
        err.to_string(),
        "operator '~*' is not supported by the sqlite dialect"
    );
}

#[test]
fn postgres_accepts_its_regex_operators() {
    let compiled = Builder::table("users")
        .filter("name", "~*", "pattern")
        .to_sql(&Grammar::new(Dialect::Postgres))
        .unwrap();
    assert_eq!(compiled.sql, "select * from \"users\" where \"name\" ~* ?");
}

//! Scenario tests for the XML mapping driver
//!
//! Each module loads small mapping documents through an in-memory locator
//! and checks the resulting class metadata or the error raised.

mod common;

use assert_matches::assert_matches;
use common::{AUDIT_LISTENER, UUID_GENERATOR, entity, load, load_with_parent};
use netabase_mapping::prelude::*;
use proptest::prelude::*;

fn one_to_one<'a>(metadata: &'a ClassMetadata, name: &str) -> &'a OneToOneAssociationMetadata {
    match metadata.property(name) {
        Some(PropertyMetadata::OneToOne(association)) => association,
        other => panic!("expected one-to-one '{}', got {:?}", name, other),
    }
}

fn many_to_one<'a>(metadata: &'a ClassMetadata, name: &str) -> &'a ManyToOneAssociationMetadata {
    match metadata.property(name) {
        Some(PropertyMetadata::ManyToOne(association)) => association,
        other => panic!("expected many-to-one '{}', got {:?}", name, other),
    }
}

fn one_to_many<'a>(metadata: &'a ClassMetadata, name: &str) -> &'a OneToManyAssociationMetadata {
    match metadata.property(name) {
        Some(PropertyMetadata::OneToMany(association)) => association,
        other => panic!("expected one-to-many '{}', got {:?}", name, other),
    }
}

fn many_to_many<'a>(metadata: &'a ClassMetadata, name: &str) -> &'a ManyToManyAssociationMetadata {
    match metadata.property(name) {
        Some(PropertyMetadata::ManyToMany(association)) => association,
        other => panic!("expected many-to-many '{}', got {:?}", name, other),
    }
}

mod root_elements {
    use super::*;

    #[test_log::test]
    fn test_minimal_entity_round_trip() {
        let metadata = load(
            r#"<entity name="X" table="x"><id name="id" type="integer"/><field name="name" type="string" length="255"/></entity>"#,
            "X",
        )
        .unwrap();

        assert_eq!(metadata.kind(), ComponentKind::Entity);
        assert_eq!(metadata.table.as_ref().unwrap().name, "x");
        assert_eq!(metadata.identifier(), vec!["id"]);

        let id = metadata.field("id").unwrap();
        assert!(id.primary_key);
        assert_eq!(id.type_name(), "integer");

        let name = metadata.field("name").unwrap();
        assert!(!name.primary_key);
        assert_eq!(name.type_name(), "string");
        assert_eq!(name.length, Some(255));
        assert_eq!(name.column_name, "name");
    }

    #[test]
    fn test_entity_attributes() {
        let metadata = load(
            r#"<entity name="App\Post" table="posts" schema="blog" repository-class="App\PostRepository" read-only="true"/>"#,
            "App\\Post",
        )
        .unwrap();

        let table = metadata.table.as_ref().unwrap();
        assert_eq!(table.qualified_name(), "blog.posts");
        assert_eq!(metadata.custom_repository_class_name.as_deref(), Some("App\\PostRepository"));
        assert!(metadata.read_only);
        assert_eq!(metadata.change_tracking_policy, ChangeTrackingPolicy::DeferredImplicit);
    }

    #[test]
    fn test_mapped_superclass_and_embeddable() {
        let superclass = load(
            r#"<mapped-superclass name="Base" repository-class="BaseRepository" read-only="true"/>"#,
            "Base",
        )
        .unwrap();
        assert!(superclass.is_mapped_superclass());
        assert_eq!(superclass.custom_repository_class_name.as_deref(), Some("BaseRepository"));
        assert!(!superclass.read_only);

        let embeddable = load(r#"<embeddable name="Address" repository-class="Nope"/>"#, "Address").unwrap();
        assert!(embeddable.is_embedded_class());
        assert!(embeddable.custom_repository_class_name.is_none());
    }

    #[test]
    fn test_missing_class_is_reported() {
        assert_matches!(
            load(r#"<entity name="X"/>"#, "Y"),
            Err(MappingError::ClassNotFound(name)) if name == "Y"
        );
    }

    #[test]
    fn test_table_options_indexes_and_constraints() {
        let metadata = load(
            &entity(
                "User",
                r#"<indexes>
                    <index name="name_idx" columns="first_name,last_name"/>
                    <index columns="created_at" flags="desc"/>
                </indexes>
                <unique-constraints>
                    <unique-constraint name="email_uniq" columns="email"/>
                </unique-constraints>
                <options>
                    <option name="charset">utf8mb4</option>
                    <option name="compression">
                        <option>zlib</option>
                    </option>
                </options>"#,
            ),
            "User",
        )
        .unwrap();

        let table = metadata.table.as_ref().unwrap();
        assert_eq!(table.name, "User");
        assert_eq!(table.indexes.len(), 2);
        assert_eq!(table.indexes[0].columns, vec!["first_name", "last_name"]);
        assert_eq!(table.indexes[1].flags, vec!["desc"]);
        assert_eq!(table.unique_constraints[0].name.as_deref(), Some("email_uniq"));
        assert_eq!(table.options.get("charset").and_then(OptionValue::as_text), Some("utf8mb4"));

        let compression = table.options.get("compression").and_then(OptionValue::as_nested).unwrap();
        assert_eq!(compression.get_index(0).and_then(OptionValue::as_text), Some("zlib"));
    }

    #[test]
    fn test_change_tracking_policy() {
        let metadata = load(r#"<entity name="X" change-tracking-policy="notify"/>"#, "X").unwrap();
        assert_eq!(metadata.change_tracking_policy, ChangeTrackingPolicy::Notify);

        assert_matches!(
            load(r#"<entity name="X" change-tracking-policy="SOMETIMES"/>"#, "X"),
            Err(MappingError::UnknownConstant { kind: "change tracking policy", .. })
        );
    }

    #[test]
    fn test_class_cache_defaults() {
        let metadata = load(r#"<entity name="App\Model\User"><cache/></entity>"#, "App\\Model\\User").unwrap();

        let cache = metadata.cache.as_ref().unwrap();
        assert_eq!(cache.usage, CacheUsage::ReadOnly);
        assert_eq!(cache.region, "app_model_user");

        let metadata = load(
            r#"<entity name="X"><cache usage="nonstrict_read_write" region="hot"/></entity>"#,
            "X",
        )
        .unwrap();
        let cache = metadata.cache.as_ref().unwrap();
        assert_eq!(cache.usage, CacheUsage::NonstrictReadWrite);
        assert_eq!(cache.region, "hot");
    }
}

mod fields {
    use super::*;

    #[test]
    fn test_field_attributes() {
        let metadata = load(
            &entity(
                "User",
                r#"<field name="email" column="email_address" unique="true" nullable="1"/>
                <field name="age" type="smallint" nullable="false"/>
                <field name="price" type="decimal" precision="10" scale="2" column-definition="DECIMAL(10,2)"/>
                <field name="bio" type="text" length="abc"/>
                <field name="lock" type="integer" version="true"/>
                <field name="code">
                    <options><option name="fixed">true</option><option name="comment">ISO</option></options>
                </field>"#,
            ),
            "User",
        )
        .unwrap();

        let email = metadata.field("email").unwrap();
        assert_eq!(email.column_name, "email_address");
        assert!(email.unique);
        assert!(email.nullable);
        assert_eq!(email.type_name(), "string");

        assert!(!metadata.field("age").unwrap().nullable);

        let price = metadata.field("price").unwrap();
        assert_eq!((price.precision, price.scale), (Some(10), Some(2)));
        assert_eq!(price.column_definition.as_deref(), Some("DECIMAL(10,2)"));

        assert_eq!(metadata.field("bio").unwrap().length, Some(0));
        assert!(metadata.field("lock").unwrap().versioned);

        let code = metadata.field("code").unwrap();
        assert_eq!(code.options.get("fixed").and_then(OptionValue::as_bool), Some(true));
        assert_eq!(code.options.get("comment").and_then(OptionValue::as_text), Some("ISO"));
    }

    #[test]
    fn test_column_names_follow_naming_strategy() {
        let driver = common::driver(&[&entity("User", r#"<field name="createdAt" type="datetime"/>"#)]).unwrap();
        let context = BuildingContext::builder()
            .naming_strategy(std::sync::Arc::new(UnderscoreNamingStrategy))
            .build();

        let metadata = driver.load_metadata_for_class("User", None, &context).unwrap();
        assert_eq!(metadata.field("createdAt").unwrap().column_name, "created_at");
    }

    #[test]
    fn test_duplicate_column_between_fields() {
        let result = load(
            &entity(
                "User",
                r#"<field name="a" column="shared"/><field name="b" column="shared"/>"#,
            ),
            "User",
        );

        assert_matches!(
            result,
            Err(error @ MappingError::DuplicateColumnName { .. }) if error.category() == ErrorCategory::DuplicateDefinition
        );
    }

    #[test]
    fn test_duplicate_column_between_field_and_id() {
        let result = load(
            &entity("User", r#"<field name="code" column="id"/><id name="id" type="integer"/>"#),
            "User",
        );

        assert_matches!(result, Err(MappingError::DuplicateColumnName { column_name, .. }) if column_name == "id");
    }

    #[test]
    fn test_field_cannot_reuse_discriminator_column() {
        let result = load(
            &entity("Animal", r#"<field name="kind" column="dtype"/>"#).replace(
                r#"<entity name="Animal">"#,
                r#"<entity name="Animal" inheritance-type="SINGLE_TABLE">"#,
            ),
            "Animal",
        );

        assert_matches!(result, Err(MappingError::DuplicateColumnName { column_name, .. }) if column_name == "dtype");
    }

    #[test]
    fn test_unknown_field_type() {
        assert_matches!(
            load(&entity("User", r#"<field name="balance" type="money"/>"#), "User"),
            Err(MappingError::UnknownType { type_name }) if type_name == "money"
        );
    }

    #[test]
    fn test_missing_field_name() {
        assert_matches!(
            load(&entity("User", r#"<field type="string"/>"#), "User"),
            Err(MappingError::MissingAttribute { attribute: "name", .. })
        );
    }

    proptest! {
        #[test]
        fn prop_every_field_becomes_a_property(
            names in prop::collection::btree_set("[a-z][a-z0-9]{0,8}", 1..12),
            nullable in any::<bool>(),
        ) {
            let body: String = names
                .iter()
                .map(|name| format!(r#"<field name="{}" type="string" nullable="{}"/>"#, name, nullable))
                .collect();
            let metadata = load(&entity("Generated", &body), "Generated").unwrap();

            prop_assert_eq!(metadata.fields().count(), names.len());
            for name in &names {
                let field = metadata.field(name).unwrap();
                prop_assert_eq!(&field.column_name, name);
                prop_assert_eq!(field.nullable, nullable);
                prop_assert!(!field.unique);
            }
        }
    }
}

mod identifiers {
    use super::*;

    #[test]
    fn test_versioned_id_is_rejected() {
        let result = load(&entity("User", r#"<id name="id" type="integer" version="true"/>"#), "User");

        assert_matches!(
            result,
            Err(error @ MappingError::CannotVersionIdField { .. }) if error.category() == ErrorCategory::InvariantViolation
        );
    }

    #[test]
    fn test_generator_strategies() {
        let metadata = load(
            &entity(
                "User",
                r#"<id name="a" type="integer"><generator/></id>
                <id name="b" type="integer"><generator strategy="NONE"/></id>
                <id name="c" type="integer"><generator strategy="sequence"/><sequence-generator sequence-name="c_seq" allocation-size="10"/></id>
                <id name="d" type="integer"/>"#,
            ),
            "User",
        )
        .unwrap();

        let a = metadata.field("a").unwrap().value_generator.as_ref().unwrap();
        assert_eq!(a.generator_type, GeneratorType::Auto);
        assert!(a.definition.is_none());

        assert!(!metadata.field("b").unwrap().has_value_generator());
        assert!(!metadata.field("d").unwrap().has_value_generator());

        let c = metadata.field("c").unwrap().value_generator.as_ref().unwrap();
        assert_eq!(c.generator_type, GeneratorType::Sequence);
        assert_eq!(
            c.definition,
            Some(GeneratorDefinition::Sequence {
                sequence_name: "c_seq".into(),
                allocation_size: "10".into(),
            })
        );
        assert_eq!(metadata.identifier(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_custom_generator() {
        let metadata = load(
            &entity(
                "User",
                &format!(
                    r#"<id name="id" type="guid"><generator strategy="CUSTOM"/><custom-id-generator class="{}"/></id>"#,
                    UUID_GENERATOR
                ),
            ),
            "User",
        )
        .unwrap();

        let generator = metadata.field("id").unwrap().value_generator.as_ref().unwrap();
        assert_eq!(generator.generator_type, GeneratorType::Custom);
        assert_matches!(
            &generator.definition,
            Some(GeneratorDefinition::Custom { class_name, arguments }) if class_name == UUID_GENERATOR && arguments.is_empty()
        );
    }

    #[test]
    fn test_custom_generator_errors() {
        assert_matches!(
            load(
                &entity("User", r#"<id name="id"><generator strategy="CUSTOM"/><custom-id-generator/></id>"#),
                "User"
            ),
            Err(MappingError::CustomGeneratorClassMissing { .. })
        );

        let result = load(
            &entity(
                "User",
                r#"<id name="id"><generator strategy="CUSTOM"/><custom-id-generator class="Nowhere"/></id>"#,
            ),
            "User",
        );
        assert_matches!(
            result,
            Err(error @ MappingError::CustomGeneratorNotFound { .. }) if error.category() == ErrorCategory::UnresolvedReference
        );
    }

    #[test]
    fn test_table_generator_is_not_supported() {
        let result = load(
            &entity("User", r#"<id name="id"><generator strategy="TABLE"/><table-generator/></id>"#),
            "User",
        );

        assert_matches!(
            result,
            Err(error @ MappingError::TableIdGeneratorNotImplemented { .. }) if error.category() == ErrorCategory::Structural
        );
    }

    #[test]
    fn test_unknown_generator_strategy() {
        assert_matches!(
            load(&entity("User", r#"<id name="id"><generator strategy="UUIDv9"/></id>"#), "User"),
            Err(MappingError::UnknownConstant { kind: "generator type", .. })
        );
    }
}

mod embedded {
    use super::*;

    #[test]
    fn test_column_prefix_policies() {
        let metadata = load(
            &entity(
                "User",
                r#"<embedded name="home" class="Address"/>
                <embedded name="work" class="Address" column-prefix="office_"/>
                <embedded name="billing" class="Address" column-prefix="bill_" use-column-prefix="false"/>
                <embedded name="shipping" class="Address" column-prefix="ship_" use-column-prefix="true"/>"#,
            ),
            "User",
        )
        .unwrap();

        let prefix = |name: &str| {
            metadata
                .property(name)
                .and_then(PropertyMetadata::as_embedded)
                .map(|embedded| embedded.column_prefix.clone())
        };

        assert_eq!(prefix("home"), Some(ColumnPrefix::Derived));
        assert_eq!(prefix("work"), Some(ColumnPrefix::Custom("office_".into())));
        assert_eq!(prefix("billing"), Some(ColumnPrefix::Disabled));
        assert_eq!(prefix("shipping"), Some(ColumnPrefix::Custom("ship_".into())));

        let home = metadata.property("home").and_then(PropertyMetadata::as_embedded).unwrap();
        assert_eq!(home.target_class, "Address");
    }
}

mod associations {
    use super::*;

    #[test]
    fn test_one_to_many_identifier_is_rejected() {
        let result = load(
            &entity(
                "Order",
                r#"<id name="lines" association-key="true"/>
                <one-to-many field="lines" target-entity="Line" mapped-by="order"/>"#,
            ),
            "Order",
        );

        assert_matches!(
            result,
            Err(error @ MappingError::IllegalToManyIdentifierAssociation { .. }) if error.category() == ErrorCategory::InvariantViolation
        );
    }

    #[test]
    fn test_many_to_many_identifier_is_rejected() {
        let result = load(
            &entity(
                "Post",
                r#"<id name="tags" association-key="true"/>
                <many-to-many field="tags" target-entity="Tag"/>"#,
            ),
            "Post",
        );

        assert_matches!(result, Err(MappingError::IllegalToManyIdentifierAssociation { field_name, .. }) if field_name == "tags");
    }

    #[test]
    fn test_one_to_one_identifier() {
        let metadata = load(
            &entity(
                "Profile",
                r#"<id name="user" association-key="true"/>
                <one-to-one field="user" target-entity="User" inversed-by="profile">
                    <join-column name="user_id" referenced-column-name="id" on-delete="cascade"/>
                </one-to-one>"#,
            ),
            "Profile",
        )
        .unwrap();

        let user = one_to_one(&metadata, "user");
        assert!(user.association.primary_key);
        assert!(user.association.owning_side);
        assert_eq!(user.association.inversed_by.as_deref(), Some("profile"));
        assert_eq!(user.join_columns.len(), 1);
        assert_eq!(user.join_columns[0].column_name, "user_id");
        assert_eq!(user.join_columns[0].on_delete, "CASCADE");
        assert_eq!(metadata.identifier(), vec!["user"]);
    }

    #[test]
    fn test_one_to_one_inverse_side() {
        let metadata = load(
            &entity(
                "User",
                r#"<one-to-one field="profile" target-entity="Profile" mapped-by="user" inversed-by="ignored" orphan-removal="true">
                    <join-column name="ignored_id"/>
                </one-to-one>"#,
            ),
            "User",
        )
        .unwrap();

        let profile = one_to_one(&metadata, "profile");
        assert!(!profile.association.owning_side);
        assert_eq!(profile.association.mapped_by.as_deref(), Some("user"));
        assert!(profile.association.inversed_by.is_none());
        assert!(profile.join_columns.is_empty());
        assert!(profile.association.orphan_removal);
    }

    #[test]
    fn test_many_to_one_join_columns_wrapper() {
        let metadata = load(
            &entity(
                "Line",
                r#"<many-to-one field="product" target-entity="Product" fetch="EAGER" orphan-removal="true">
                    <join-columns>
                        <join-column name="product_id" referenced-column-name="id" nullable="false"/>
                        <join-column name="product_variant" referenced-column-name="variant"/>
                    </join-columns>
                </many-to-one>"#,
            ),
            "Line",
        )
        .unwrap();

        let product = many_to_one(&metadata, "product");
        assert!(product.association.owning_side);
        assert_eq!(product.association.fetch_mode, FetchMode::Eager);
        assert!(!product.association.orphan_removal);
        assert!(!product.association.primary_key);

        let columns: Vec<_> = product.join_columns.iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(columns, vec!["product_id", "product_variant"]);
        assert!(!product.join_columns[0].nullable);
        assert!(product.join_columns[1].nullable);
    }

    #[test]
    fn test_one_to_many_collection() {
        let metadata = load(
            &entity(
                "User",
                r#"<one-to-many field="posts" target-entity="Post" mapped-by="author" index-by="slug" orphan-removal="1">
                    <cascade><cascade-persist/><cascade-remove/></cascade>
                    <order-by>
                        <order-by-field name="publishedAt" direction="DESC"/>
                        <order-by-field name="id"/>
                    </order-by>
                </one-to-many>"#,
            ),
            "User",
        )
        .unwrap();

        let posts = one_to_many(&metadata, "posts");
        assert!(!posts.association.owning_side);
        assert_eq!(posts.association.mapped_by.as_deref(), Some("author"));
        assert!(posts.association.orphan_removal);
        assert_eq!(posts.association.cascade, vec![CascadeAction::Persist, CascadeAction::Remove]);
        assert_eq!(posts.collection.index_by.as_deref(), Some("slug"));

        let order: Vec<_> = posts
            .collection
            .order_by
            .iter()
            .map(|(field, direction)| (field.as_str(), direction.as_str()))
            .collect();
        assert_eq!(order, vec![("publishedAt", "DESC"), ("id", "ASC")]);
        assert!(metadata.property("posts").unwrap().is_to_many());
    }

    #[test]
    fn test_one_to_many_requires_mapped_by() {
        assert_matches!(
            load(&entity("User", r#"<one-to-many field="posts" target-entity="Post"/>"#), "User"),
            Err(MappingError::MissingAttribute { attribute: "mapped-by", .. })
        );
    }

    #[test]
    fn test_index_by_element_is_rejected() {
        let result = load(
            &entity(
                "User",
                r#"<one-to-many field="posts" target-entity="Post" mapped-by="author"><index-by name="slug"/></one-to-many>"#,
            ),
            "User",
        );

        assert_matches!(result, Err(MappingError::InvalidIndexByElement { field_name, .. }) if field_name == "posts");
    }

    #[test]
    fn test_many_to_many_owning_side() {
        let metadata = load(
            &entity(
                "Post",
                r#"<many-to-many field="tags" target-entity="Tag" inversed-by="posts" fetch="EXTRA_LAZY">
                    <join-table name="post_tags" schema="blog">
                        <join-columns><join-column name="post_id" referenced-column-name="id"/></join-columns>
                        <inverse-join-columns><join-column name="tag_id" referenced-column-name="id"/></inverse-join-columns>
                    </join-table>
                </many-to-many>"#,
            ),
            "Post",
        )
        .unwrap();

        let tags = many_to_many(&metadata, "tags");
        assert!(tags.association.owning_side);
        assert_eq!(tags.association.inversed_by.as_deref(), Some("posts"));
        assert_eq!(tags.association.fetch_mode, FetchMode::ExtraLazy);

        let join_table = tags.join_table.as_ref().unwrap();
        assert_eq!(join_table.name.as_deref(), Some("post_tags"));
        assert_eq!(join_table.schema.as_deref(), Some("blog"));
        assert_eq!(join_table.join_columns[0].column_name, "post_id");
        assert_eq!(join_table.inverse_join_columns[0].column_name, "tag_id");
    }

    #[test]
    fn test_many_to_many_without_join_table() {
        let metadata = load(
            &entity(
                "Tag",
                r#"<many-to-many field="posts" target-entity="Post" mapped-by="tags"/>
                <many-to-many field="related" target-entity="Tag" inversed-by="ignored"/>"#,
            ),
            "Tag",
        )
        .unwrap();

        let posts = many_to_many(&metadata, "posts");
        assert!(!posts.association.owning_side);
        assert!(posts.join_table.is_none());

        let related = many_to_many(&metadata, "related");
        assert!(related.association.owning_side);
        assert!(related.association.inversed_by.is_none());
        assert!(related.join_table.is_none());
    }

    #[test]
    fn test_fetch_mode_is_case_sensitive() {
        assert_matches!(
            load(
                &entity("Line", r#"<many-to-one field="product" target-entity="Product" fetch="eager"/>"#),
                "Line"
            ),
            Err(error @ MappingError::UnknownConstant { kind: "fetch mode", .. }) if error.category() == ErrorCategory::Lookup
        );
    }

    #[test]
    fn test_association_cache() {
        let metadata = load(
            r#"<entity name="App\User"><one-to-many field="posts" target-entity="Post" mapped-by="author"><cache usage="READ_WRITE"/></one-to-many></entity>"#,
            "App\\User",
        )
        .unwrap();

        let cache = metadata.property("posts").and_then(PropertyMetadata::cache).unwrap();
        assert_eq!(cache.usage, CacheUsage::ReadWrite);
        assert_eq!(cache.region, "app_user__posts");
        assert!(metadata.cache.is_none());
    }

    #[test]
    fn test_duplicate_property_name() {
        let result = load(
            &entity(
                "User",
                r#"<field name="group"/><many-to-one field="group" target-entity="Group"/>"#,
            ),
            "User",
        );

        assert_matches!(result, Err(MappingError::DuplicateProperty { field_name, .. }) if field_name == "group");
    }
}

mod inheritance {
    use super::*;

    fn single_table_parent() -> ClassMetadata {
        let mut parent = ClassMetadata::new("Animal", None);
        parent.inheritance_type = InheritanceType::SingleTable;
        parent.table = Some(TableMetadata::new("animals"));
        parent
    }

    #[test]
    fn test_child_reuses_single_table() {
        let metadata = load_with_parent(
            r#"<mapped-superclass name="Pet" table="ignored" schema="ignored"/>"#,
            "Pet",
            single_table_parent(),
        )
        .unwrap();

        assert_eq!(metadata.table, Some(TableMetadata::new("animals")));
        assert_eq!(metadata.parent().map(ClassMetadata::class_name), Some("Animal"));
    }

    #[test]
    fn test_table_lookup_skips_mapped_superclasses() {
        let root = std::sync::Arc::new(single_table_parent());
        let mut middle = ClassMetadata::new("Pet", Some(root));
        middle.set_kind(ComponentKind::MappedSuperclass);
        middle.inheritance_type = InheritanceType::SingleTable;
        middle.table = Some(TableMetadata::new("pets"));

        let metadata = load_with_parent(r#"<entity name="Dog"/>"#, "Dog", middle).unwrap();
        assert_eq!(metadata.table.as_ref().map(|t| t.name.as_str()), Some("animals"));
        assert_eq!(metadata.root_class_name(), "Animal");
    }

    #[test]
    fn test_joined_parent_does_not_share_its_table() {
        let mut parent = ClassMetadata::new("Animal", None);
        parent.inheritance_type = InheritanceType::Joined;
        parent.table = Some(TableMetadata::new("animals"));

        let metadata = load_with_parent(r#"<entity name="Dog" table="dogs"/>"#, "Dog", parent).unwrap();
        assert_eq!(metadata.table.as_ref().map(|t| t.name.as_str()), Some("dogs"));
    }

    #[test]
    fn test_discriminator_defaults() {
        let metadata = load(r#"<entity name="Animal" inheritance-type="single_table"/>"#, "Animal").unwrap();

        assert_eq!(metadata.inheritance_type, InheritanceType::SingleTable);
        let column = metadata.discriminator_column.as_ref().unwrap();
        assert_eq!(column.column_name, "dtype");
        assert_eq!(column.type_handle.name(), "string");
        assert_eq!(column.length, Some(255));
        assert!(metadata.discriminator_map.is_empty());
    }

    #[test]
    fn test_discriminator_map_keeps_last_class() {
        let metadata = load(
            r#"<entity name="Animal" inheritance-type="JOINED">
                <discriminator-column name="kind" type="string" length="32"/>
                <discriminator-map>
                    <discriminator-mapping value="dog" class="Dog"/>
                    <discriminator-mapping value="cat" class="Cat"/>
                    <discriminator-mapping value="dog" class="Wolf"/>
                </discriminator-map>
            </entity>"#,
            "Animal",
        )
        .unwrap();

        let column = metadata.discriminator_column.as_ref().unwrap();
        assert_eq!((column.column_name.as_str(), column.length), ("kind", Some(32)));

        let entries: Vec<_> = metadata
            .discriminator_map
            .iter()
            .map(|(value, class)| (value.as_str(), class.as_str()))
            .collect();
        assert_eq!(entries, vec![("dog", "Wolf"), ("cat", "Cat")]);
    }

    #[test]
    fn test_none_inheritance_has_no_discriminator() {
        let metadata = load(
            r#"<entity name="Animal" inheritance-type="none"><discriminator-column name="kind"/></entity>"#,
            "Animal",
        )
        .unwrap();

        assert_eq!(metadata.inheritance_type, InheritanceType::None);
        assert!(metadata.discriminator_column.is_none());
    }

    #[test]
    fn test_unknown_inheritance_type() {
        assert_matches!(
            load(r#"<entity name="Animal" inheritance-type="SINGLE"/>"#, "Animal"),
            Err(MappingError::UnknownConstant { kind: "inheritance type", value }) if value == "SINGLE"
        );
    }
}

mod overrides {
    use super::*;

    #[test]
    fn test_attribute_override_replaces_field() {
        let metadata = load(
            &entity(
                "Admin",
                r#"<field name="name" column="name" length="50"/>
                <field name="email"/>
                <attribute-overrides>
                    <attribute-override name="name">
                        <field column="admin_name" length="140"/>
                    </attribute-override>
                    <attribute-override name="inherited">
                        <field column="inherited_column" type="integer"/>
                    </attribute-override>
                </attribute-overrides>"#,
            ),
            "Admin",
        )
        .unwrap();

        let name = metadata.field("name").unwrap();
        assert_eq!(name.column_name, "admin_name");
        assert_eq!(name.length, Some(140));
        assert_eq!(metadata.property_names().collect::<Vec<_>>(), vec!["name", "email", "inherited"]);
        assert_eq!(metadata.field("inherited").unwrap().type_name(), "integer");
    }

    #[test]
    fn test_attribute_override_may_keep_its_own_column() {
        let metadata = load(
            &entity(
                "Admin",
                r#"<field name="name" length="50"/>
                <attribute-overrides>
                    <attribute-override name="name"><field column="name" length="80"/></attribute-override>
                </attribute-overrides>"#,
            ),
            "Admin",
        )
        .unwrap();

        assert_eq!(metadata.field("name").unwrap().length, Some(80));
    }

    #[test]
    fn test_attribute_override_column_collision() {
        let result = load(
            &entity(
                "Admin",
                r#"<field name="name"/><field name="email"/>
                <attribute-overrides>
                    <attribute-override name="name"><field column="email"/></attribute-override>
                </attribute-overrides>"#,
            ),
            "Admin",
        );

        assert_matches!(result, Err(MappingError::DuplicateColumnName { column_name, .. }) if column_name == "email");
    }

    #[test]
    fn test_attribute_override_keeps_identifier() {
        let metadata = load(
            &entity(
                "User",
                r#"<id name="id" type="integer"><generator strategy="AUTO"/></id>
                <attribute-overrides>
                    <attribute-override name="id"><field column="user_id" type="integer"/></attribute-override>
                </attribute-overrides>"#,
            ),
            "User",
        )
        .unwrap();

        assert_eq!(metadata.identifier(), vec!["id"]);
        let id = metadata.field("id").unwrap();
        assert_eq!(id.column_name, "user_id");
        assert!(id.primary_key);
        assert_eq!(
            id.value_generator.as_ref().map(|g| g.generator_type),
            Some(GeneratorType::Auto)
        );
    }

    #[test]
    fn test_attribute_override_cannot_version_identifier() {
        let result = load(
            &entity(
                "User",
                r#"<id name="id" type="integer"/>
                <attribute-overrides>
                    <attribute-override name="id"><field column="user_id" version="true"/></attribute-override>
                </attribute-overrides>"#,
            ),
            "User",
        );

        assert_matches!(result, Err(MappingError::CannotVersionIdField { field_name, .. }) if field_name == "id");
    }

    #[test]
    fn test_attribute_override_of_association_is_rejected() {
        let result = load(
            &entity(
                "User",
                r#"<many-to-one field="group" target-entity="Group"/>
                <attribute-overrides>
                    <attribute-override name="group"><field column="group_name"/></attribute-override>
                </attribute-overrides>"#,
            ),
            "User",
        );

        assert_matches!(
            result,
            Err(MappingError::OverrideNotApplicable { element, kind: "many-to-one", .. })
                if element == "attribute-override"
        );
    }

    #[test]
    fn test_association_override_rebuilds_association() {
        let metadata = load(
            &entity(
                "Admin",
                r#"<many-to-one field="group" target-entity="Group" fetch="EAGER">
                    <cascade><cascade-persist/></cascade>
                    <join-column name="group_id" referenced-column-name="id"/>
                </many-to-one>
                <association-overrides>
                    <association-override name="group" fetch="LAZY">
                        <join-columns><join-column name="admin_group_id" referenced-column-name="id"/></join-columns>
                        <inversed-by name="admins"/>
                    </association-override>
                </association-overrides>"#,
            ),
            "Admin",
        )
        .unwrap();

        let group = many_to_one(&metadata, "group");
        assert_eq!(group.join_columns[0].column_name, "admin_group_id");
        assert_eq!(group.association.inversed_by.as_deref(), Some("admins"));
        assert_eq!(group.association.fetch_mode, FetchMode::Lazy);
        // not carried over from the overridden association
        assert!(group.association.target_entity.is_empty());
        assert!(group.association.cascade.is_empty());
    }

    #[test]
    fn test_many_to_many_join_table_override() {
        let metadata = load(
            &entity(
                "Admin",
                r#"<many-to-many field="roles" target-entity="Role">
                    <join-table name="user_roles"/>
                </many-to-many>
                <association-overrides>
                    <association-override name="roles">
                        <join-table name="admin_roles">
                            <join-columns><join-column name="admin_id" referenced-column-name="id"/></join-columns>
                        </join-table>
                    </association-override>
                </association-overrides>"#,
            ),
            "Admin",
        )
        .unwrap();

        let join_table = many_to_many(&metadata, "roles").join_table.as_ref().unwrap();
        assert_eq!(join_table.name.as_deref(), Some("admin_roles"));
        assert_eq!(join_table.join_columns[0].column_name, "admin_id");
    }

    #[test]
    fn test_association_override_of_unknown_property() {
        let result = load(
            &entity(
                "Admin",
                r#"<association-overrides><association-override name="ghost"/></association-overrides>"#,
            ),
            "Admin",
        );

        assert_matches!(
            result,
            Err(error @ MappingError::InvalidOverrideFieldName { .. }) if error.category() == ErrorCategory::Structural
        );
    }

    #[test]
    fn test_association_override_conflicts() {
        let result = load(
            &entity(
                "Admin",
                r#"<many-to-one field="group" target-entity="Group"/>
                <association-overrides>
                    <association-override name="group"><join-table name="nope"/></association-override>
                </association-overrides>"#,
            ),
            "Admin",
        );
        assert_matches!(
            result,
            Err(MappingError::OverrideNotApplicable { element, kind: "many-to-one", .. }) if element == "join-table"
        );

        let result = load(
            &entity(
                "Admin",
                r#"<field name="name"/>
                <association-overrides><association-override name="name"/></association-overrides>"#,
            ),
            "Admin",
        );
        assert_matches!(result, Err(MappingError::OverrideNotApplicable { kind: "field", .. }));
    }
}

mod callbacks {
    use super::*;

    #[test]
    fn test_lifecycle_callbacks() {
        let metadata = load(
            &entity(
                "User",
                r#"<lifecycle-callbacks>
                    <lifecycle-callback type="prePersist" method="onCreate"/>
                    <lifecycle-callback type="preUpdate" method="onUpdate"/>
                    <lifecycle-callback type="prePersist" method="validate"/>
                </lifecycle-callbacks>"#,
            ),
            "User",
        )
        .unwrap();

        assert_eq!(metadata.lifecycle_callbacks(LifecycleEvent::PrePersist), ["onCreate", "validate"]);
        assert_eq!(metadata.lifecycle_callbacks(LifecycleEvent::PreUpdate), ["onUpdate"]);
        assert!(!metadata.has_lifecycle_callbacks(LifecycleEvent::PostLoad));
    }

    #[test]
    fn test_unknown_lifecycle_event() {
        assert_matches!(
            load(
                &entity(
                    "User",
                    r#"<lifecycle-callbacks><lifecycle-callback type="PrePersist" method="x"/></lifecycle-callbacks>"#
                ),
                "User"
            ),
            Err(MappingError::UnknownConstant { kind: "lifecycle event", .. })
        );
    }

    #[test_log::test]
    fn test_entity_listeners_keep_raw_event_names() {
        let metadata = load(
            &entity(
                "User",
                &format!(
                    r#"<entity-listeners>
                        <entity-listener class="{}">
                            <lifecycle-callback type="postPersist" method="onPersist"/>
                            <lifecycle-callback type="afterSomething" method="onCustom"/>
                        </entity-listener>
                    </entity-listeners>"#,
                    AUDIT_LISTENER
                ),
            ),
            "User",
        )
        .unwrap();

        let listeners: Vec<_> = metadata
            .entity_listeners()
            .iter()
            .map(|l| (l.event.as_str(), l.listener_class.as_str(), l.method.as_str()))
            .collect();
        assert_eq!(
            listeners,
            vec![
                ("postPersist", AUDIT_LISTENER, "onPersist"),
                ("afterSomething", AUDIT_LISTENER, "onCustom"),
            ]
        );
    }

    #[test]
    fn test_unknown_entity_listener_class() {
        let result = load(
            &entity(
                "User",
                r#"<entity-listeners><entity-listener class="App\Missing"/></entity-listeners>"#,
            ),
            "User",
        );

        assert_matches!(
            result,
            Err(MappingError::EntityListenerClassNotFound { listener_class, .. }) if listener_class == "App\\Missing"
        );
    }
}

use std::path::{Path, PathBuf};

use fargen_build::artifact::{DocumentBody, OverwritePolicy};
use fargen_build::buildspec::{BuildspecFile, UnittestBuildspecFile};
use fargen_build::compose::ComposeFile;
use fargen_build::container_definitions::{ContainerDefinition, ContainerDefinitionsFile};
use fargen_build::dockerfile::DockerFile;
use fargen_build::makefile::MakeFile;
use fargen_build::scaffold::{ModulesInit, PipFile, ScriptFile};
use fargen_build::terraform::TerraformScheduledTaskFile;
use fargen_core::{
    CicdPipeline, ContainerDeployment, DockerImage, EcsTask, ProjectConfig, TaskKind,
};

fn project_config() -> ProjectConfig {
    ProjectConfig {
        account_id: "211367837384".to_owned(),
        region: "ap-northeast-1".to_owned(),
        vpc_name: "vpc_central".to_owned(),
        ecs_cluster_name: "persistent-cluster".to_owned(),
        git_repo_name: "dishes".to_owned(),
        git_repo_branch: "master".to_owned(),
    }
}

fn deployment(name: &str) -> ContainerDeployment {
    ContainerDeployment {
        image: DockerImage {
            name: name.to_owned(),
            environment: "production".to_owned(),
            description: format!("Runs the {name} service"),
            script_name: "main".to_owned(),
            ecr_endpoint: project_config().ecr_endpoint(),
            python_version: "3.7.4".to_owned(),
            tag: "latest".to_owned(),
        },
        essential: true,
    }
}

/// The reference scenario: task `slimdish` in production with the
/// `annoy` and `d2v` deployments.
fn slimdish() -> EcsTask {
    EcsTask {
        name: "slimdish".to_owned(),
        environment: "production".to_owned(),
        cpu: 512,
        memory: 2048,
        region: "ap-northeast-1".to_owned(),
        deployments: vec![deployment("annoy"), deployment("d2v")],
        subnets: vec!["subnet1".to_owned(), "subnet2".to_owned()],
        security_groups: vec!["sg1".to_owned(), "sg2".to_owned()],
        kind: TaskKind::Scheduled {
            schedule_expression: "cron(0 15 * * ? *)".to_owned(),
        },
        pipeline: None,
    }
}

fn empty_task() -> EcsTask {
    EcsTask {
        deployments: vec![],
        ..slimdish()
    }
}

// ── Compose ──

#[test]
fn compose_path_matches_task_and_environment() {
    let task = slimdish();
    assert_eq!(
        ComposeFile::new(&task).path(),
        PathBuf::from("docker-compose-slimdish-production.yml")
    );
}

#[test]
fn compose_has_one_service_per_deployment() {
    let task = slimdish();
    let doc = ComposeFile::new(&task).document().unwrap();

    assert_eq!(doc.version, "3.2");
    assert_eq!(doc.services.len(), 2);
    for deployment in &task.deployments {
        let name = deployment.image.name.as_str();
        let service = doc
            .services
            .get(name)
            .unwrap_or_else(|| panic!("service '{name}' missing"));
        assert_eq!(
            service.get("image").and_then(|v| v.as_str()),
            Some(deployment.image.uri().as_str())
        );
        assert_eq!(
            service
                .get("build")
                .and_then(|b| b.get("dockerfile"))
                .and_then(|v| v.as_str()),
            Some(format!("Dockerfile-{name}").as_str())
        );
        let env = service.get("environment").and_then(|v| v.as_sequence());
        assert_eq!(
            env.and_then(|e| e[0].as_str()),
            Some("RUNTIME_ENVIRONMENT=production")
        );
    }
}

#[test]
fn compose_with_zero_deployments_is_valid_and_empty() {
    let task = empty_task();
    let doc = ComposeFile::new(&task).document().unwrap();
    assert!(doc.services.is_empty());
    assert!(ComposeFile::new(&task).artifact().is_ok());
}

// ── Buildspec ──

#[test]
fn buildspec_path_and_phases() {
    let task = slimdish();
    let file = BuildspecFile::new(&task);

    assert_eq!(
        file.path(),
        PathBuf::from("buildspec/buildspec-dockerbuild-slimdish-production.yml")
    );

    let doc = file.document().unwrap();
    assert_eq!(doc.version, "0.2");
    assert_eq!(
        doc.phases.pre_build.commands,
        vec!["$(aws ecr get-login --no-include-email --region ap-northeast-1)"]
    );
    assert_eq!(
        doc.phases.build.commands,
        vec!["docker-compose -f docker-compose-slimdish-production.yml build"]
    );
    assert_eq!(
        doc.phases.post_build[0],
        "docker-compose -f docker-compose-slimdish-production.yml push"
    );
    assert_eq!(doc.artifacts.files, "imagedefinitions_slimdish-production.json");
}

#[test]
fn buildspec_image_definitions_cover_all_deployments() {
    let task = slimdish();
    let defs = BuildspecFile::new(&task).image_definitions();

    assert_eq!(defs.len(), 2);
    assert!(defs[0].image_uri.ends_with("annoy_production:latest"));
    assert!(defs[1].image_uri.ends_with("d2v_production:latest"));
}

#[test]
fn buildspec_printf_payload_is_valid_json() {
    let task = slimdish();
    let doc = BuildspecFile::new(&task).document().unwrap();

    let printf = &doc.phases.post_build[1];
    assert!(printf.starts_with("printf '%s' '"), "got: {printf}");

    // Recover the single-quoted payload and check it parses as the
    // image-definitions array.
    let start = printf.find("'%s' '").unwrap() + "'%s' ".len();
    let end = printf.rfind("' > ").unwrap() + 1;
    let payload = &printf[start..end];
    let inner = payload.trim_matches('\'');
    let parsed: Vec<serde_json::Value> = serde_json::from_str(inner).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["name"], "annoy");
    assert!(
        parsed[1]["imageUri"]
            .as_str()
            .unwrap()
            .ends_with("d2v_production:latest")
    );
}

#[test]
fn buildspec_references_the_compose_renderer_filename() {
    let task = slimdish();
    let compose_name = ComposeFile::file_name(&task);
    let doc = BuildspecFile::new(&task).document().unwrap();
    assert!(doc.phases.build.commands[0].contains(&compose_name));
    assert!(doc.phases.post_build[0].contains(&compose_name));
}

#[test]
fn unittest_buildspec_runs_each_container_test_suite() {
    let task = slimdish();
    let file = UnittestBuildspecFile::new(&task);

    assert_eq!(
        file.path(),
        PathBuf::from("buildspec/buildspec-unittest-slimdish-allenvs.yml")
    );

    let doc = file.document();
    assert_eq!(doc.version, "0.2");
    assert_eq!(doc.phases.install.commands, vec!["pip install --upgrade pipenv"]);
    assert_eq!(doc.phases.build.commands.len(), 2);
    assert!(doc.phases.build.commands[0].contains("cd containers/annoy"));
    assert!(doc.phases.build.commands[1].contains("cd containers/d2v"));

    // Users grow the stub with their real test commands.
    assert_eq!(
        file.artifact().unwrap().overwrite,
        OverwritePolicy::KeepExisting
    );
}

// ── Container definitions ──

#[test]
fn container_definitions_preserve_deployment_order() {
    let task = slimdish();
    let file = ContainerDefinitionsFile::new(&task);

    assert_eq!(
        file.path(),
        PathBuf::from(
            "terraform/container_definitions/container_definitions-slimdish-production.json"
        )
    );

    let doc = file.document();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc[0].name, "annoy");
    assert_eq!(doc[1].name, "d2v");

    let annoy = &doc[0];
    assert!(annoy.image.ends_with("annoy_production:latest"));
    assert!(annoy.essential);
    assert_eq!(annoy.environment[0].name, "RUNTIME_ENVIRONMENT");
    assert_eq!(annoy.environment[0].value, "production");
    assert_eq!(annoy.docker_labels.name, "annoy");
    assert_eq!(annoy.log_configuration.log_driver, "awslogs");
    assert_eq!(
        annoy.log_configuration.options.group,
        "/aws/ecs/slimdish/annoy/production"
    );
    assert_eq!(annoy.log_configuration.options.region, "ap-northeast-1");
    assert_eq!(annoy.log_configuration.options.stream_prefix, "ecs");
}

#[test]
fn container_definitions_round_trip_through_json() {
    let task = slimdish();
    let doc = ContainerDefinitionsFile::new(&task).document();

    let serialized = serde_json::to_string(&doc).unwrap();
    let parsed: Vec<ContainerDefinition> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn container_definitions_empty_for_zero_deployments() {
    let task = empty_task();
    assert!(ContainerDefinitionsFile::new(&task).document().is_empty());
}

// ── Dockerfile / scaffolding ──

#[test]
fn dockerfile_renders_image_specifics() {
    let dep = deployment("annoy");
    let file = DockerFile::new(&dep.image);

    assert_eq!(file.path(), PathBuf::from("containers/Dockerfile-annoy"));

    let text = file.render();
    assert!(text.contains("FROM python:3.7.4"));
    assert!(text.contains("COPY annoy/Pipfile /workdir/"));
    assert!(text.contains("COPY annoy/*.py services/annoy/"));
    assert!(text.contains("COPY modules services/modules"));
    assert!(text.contains(r#"LABEL org.label-schema.description = "Runs the annoy service""#));
    assert!(text.contains("CMD python -m services.annoy.main"));
}

#[test]
fn pipfile_uses_minor_python_version() {
    let dep = deployment("annoy");
    let file = PipFile::new(&dep.image);
    assert_eq!(file.path(), PathBuf::from("containers/annoy/Pipfile"));
    assert!(file.render().contains("python_version = \"3.7\""));
}

#[test]
fn script_stub_path_uses_script_name() {
    let dep = deployment("annoy");
    let file = ScriptFile::new(&dep.image);
    assert_eq!(file.path(), PathBuf::from("containers/annoy/main.py"));
    assert!(file.render().contains("def main():"));
}

#[test]
fn modules_placeholder_satisfies_the_dockerfile_copy() {
    // Every Dockerfile runs `COPY modules services/modules`; the scaffold
    // puts the package in the build context so the first build succeeds.
    let file = ModulesInit;
    assert_eq!(
        file.path(),
        PathBuf::from("containers/modules/__init__.py")
    );
    assert_eq!(file.artifact().overwrite, OverwritePolicy::KeepExisting);

    let dep = deployment("annoy");
    assert!(DockerFile::new(&dep.image).render().contains("COPY modules services/modules"));
}

// ── Makefile ──

#[test]
fn makefile_targets_cover_all_deployments() {
    let tasks = vec![slimdish()];
    let text = MakeFile::new(&tasks).render();

    assert!(text.contains("lock_dependencies:"));
    assert!(text.contains("\tcd containers/annoy && pipenv install"));
    assert!(text.contains("\tcd containers/d2v && pipenv install"));
    assert!(
        text.contains("\tdocker-compose -f docker-compose-slimdish-production.yml build")
    );
    assert!(text.contains("run_annoy:"));
    assert!(text.contains("run_d2v:"));
    assert!(text.contains("tfinit:"));
    assert!(text.contains("tfapply:"));
}

// ── Terraform ──

#[test]
fn terraform_rejects_unscheduled_tasks() {
    let mut task = slimdish();
    task.kind = TaskKind::Service;
    let config = project_config();
    let cd_path = ContainerDefinitionsFile::new(&task).path();

    let err = TerraformScheduledTaskFile::new(&task, &config, &cd_path)
        .err()
        .expect("service task must be rejected")
        .to_string();
    assert!(err.contains("no schedule expression"), "got: {err}");
    assert!(err.contains("slimdish"), "got: {err}");
}

#[test]
fn terraform_references_container_definitions_relative_to_terraform_dir() {
    let task = slimdish();
    let config = project_config();
    let cd_path = ContainerDefinitionsFile::new(&task).path();

    let file = TerraformScheduledTaskFile::new(&task, &config, &cd_path).unwrap();
    assert_eq!(
        file.path(),
        PathBuf::from("terraform/slimdish-production.tf")
    );

    let text = file.render().unwrap();
    let reference =
        r#"container_definitions = "${file("container_definitions/container_definitions-slimdish-production.json")}""#;
    assert!(text.contains(reference), "got:\n{text}");

    // The referenced path, resolved against terraform/, is the path the
    // container-definitions renderer declared.
    let resolved = Path::new("terraform")
        .join("container_definitions/container_definitions-slimdish-production.json");
    assert_eq!(resolved, cd_path);
}

#[test]
fn terraform_module_block_carries_task_settings() {
    let task = slimdish();
    let config = project_config();
    let cd_path = ContainerDefinitionsFile::new(&task).path();
    let text = TerraformScheduledTaskFile::new(&task, &config, &cd_path)
        .unwrap()
        .render()
        .unwrap();

    assert!(text.contains(r#"module "fargate-scheduled-slimdish-production""#));
    assert!(text.contains(r#"schedule_expression   = "cron(0 15 * * ? *)""#));
    assert!(text.contains(
        r#"cluster_arn           = "arn:aws:ecs:ap-northeast-1:211367837384:cluster/persistent-cluster""#
    ));
    assert!(text.contains(r#"memory                = "2048""#));
    assert!(text.contains(r#"cpu                   = "512""#));
    assert!(text.contains(r#"subnets               = ["subnet1","subnet2"]"#));
    assert!(text.contains(r#"security_groups       = ["sg1","sg2"]"#));
    assert!(text.contains(r#""annoy" = "/aws/ecs/slimdish/annoy/production""#));
    assert!(text.contains(r#""d2v" = "/aws/ecs/slimdish/d2v/production""#));

    // No pipeline configured: no CI/CD module.
    assert!(!text.contains("codepipeline-dockerbuild"));
}

#[test]
fn terraform_emits_cicd_module_when_pipeline_present() {
    let mut task = slimdish();
    task.pipeline = Some(CicdPipeline {
        unittest_subnets: vec!["subnet9".to_owned()],
        unittest_security_groups: vec!["sg9".to_owned()],
    });
    let config = project_config();
    let cd_path = ContainerDefinitionsFile::new(&task).path();
    let text = TerraformScheduledTaskFile::new(&task, &config, &cd_path)
        .unwrap()
        .render()
        .unwrap();

    assert!(text.contains(r#"module "slimdish-production-cicd""#));
    assert!(text.contains("halfdanrump/codepipeline-dockerbuild/aws"));
    assert!(text.contains(r#"git_repo                   = "dishes""#));
    assert!(text.contains(
        r#"dockerbuild_buildspec_path = "buildspec/buildspec-dockerbuild-slimdish-production.yml""#
    ));
    // The referenced unittest buildspec is exactly the path its renderer
    // will write to.
    let unittest_path = UnittestBuildspecFile::file_path(&task);
    assert!(
        text.contains(&format!(
            "unittest_buildspec_path    = \"{}\"",
            unittest_path.display()
        )),
        "got:\n{text}"
    );
    assert!(text.contains(r#"unittest_subnets           = ["subnet9"]"#));
    assert!(text.contains(r#"unittest_vpc               = "vpc_central""#));
}

// ── Bodies ──

#[test]
fn artifact_bodies_match_declared_formats() {
    let task = slimdish();
    let config = project_config();

    assert!(matches!(
        ComposeFile::new(&task).artifact().unwrap().body,
        DocumentBody::Yaml(_)
    ));
    assert!(matches!(
        ContainerDefinitionsFile::new(&task).artifact().unwrap().body,
        DocumentBody::Json(_)
    ));
    let cd_path = ContainerDefinitionsFile::new(&task).path();
    let tf = TerraformScheduledTaskFile::new(&task, &config, &cd_path).unwrap();
    assert!(matches!(tf.artifact().unwrap().body, DocumentBody::Text(_)));
}
